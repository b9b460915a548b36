// src/normalize/distance.rs

use crate::domain::Listing;
use crate::stats::RunStats;
use regex::Regex;
use std::sync::OnceLock;

/// Places we normalize a distance for, as the directory names them,
/// paired with the derived field they land in.
pub const TRACKED_PLACES: [&str; 3] = ["les", "restaurace", "obchod"];

const WALKING_SPEED_KMH: f64 = 5.0;

fn distance_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d*[.,]?\d+)\s*(min|m|km)").unwrap())
}

/// Parse a free-text distance ("500 m", "2 km", "asi 10 min") into meters.
/// Decimal comma is accepted. Minutes assume a 5 km/h walk. `None` means
/// the text did not match; callers must treat that as unknown, never zero.
pub fn extract_normalized_distance(text: &str) -> Option<f64> {
    let captures = distance_regex().captures(text)?;
    let value: f64 = captures[1].replace(',', ".").parse().ok()?;
    match &captures[2] {
        "m" => Some(value),
        "km" => Some(value * 1000.0),
        "min" => Some(value * WALKING_SPEED_KMH * 1000.0 / 60.0),
        _ => None,
    }
}

/// Rebuild the lowercased place -> text lookup from the scraped pairs.
pub fn distances_to_map(listing: &mut Listing) {
    listing.distances_map = listing
        .distances
        .iter()
        .map(|(place, dist)| (place.to_lowercase(), dist.clone()))
        .collect();
}

/// Normalize the distance to each tracked place, counting misses and
/// malformed values separately.
pub fn add_distances(listing: &mut Listing, stats: &mut RunStats) {
    for place in TRACKED_PLACES {
        let Some(text) = listing.distances_map.get(place).filter(|t| !t.is_empty()) else {
            stats.incr(&format!("distance_to_{place}_missing"));
            continue;
        };
        stats.incr(&format!("{place}_distance_present"));
        let Some(meters) = extract_normalized_distance(text) else {
            stats.incr(&format!("distance_to_{place}_malformed"));
            continue;
        };
        match place {
            "les" => listing.forest_distance_m = Some(meters),
            "restaurace" => listing.restaurant_distance_m = Some(meters),
            "obchod" => listing.shop_distance_m = Some(meters),
            _ => {}
        }
        stats.add_distance_sample(place, meters);
    }
}
