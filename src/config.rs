// src/config.rs

/// Thresholds the eligibility filter runs against. The filter is a pure
/// function of (listing, limits), so tests can pin their own limits while
/// the CLI runs with `FilterLimits::default()`.
#[derive(Debug, Clone)]
pub struct FilterLimits {
    pub min_beds: u32,
    pub max_beds: u32,
    pub min_rooms: u32,
    pub max_restaurant_distance_m: f64,
    /// Ceiling on the normalized per-day, per-object price (Kč).
    pub max_price: i64,
    /// Eastern longitude bound. Was 16.6 once, moved because of Beskydy.
    pub max_longitude_e: f64,
    /// Region slugs excluded outright.
    pub blocked_areas: Vec<String>,
}

impl Default for FilterLimits {
    fn default() -> Self {
        FilterLimits {
            min_beds: 22,
            max_beds: 42,
            min_rooms: 7,
            max_restaurant_distance_m: 1500.0,
            max_price: 15000,
            max_longitude_e: 19.0,
            blocked_areas: vec!["jeseniky".to_string(), "slovensko_chaty".to_string()],
        }
    }
}
