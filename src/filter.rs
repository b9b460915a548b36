// src/filter.rs

use crate::config::FilterLimits;
use crate::domain::Listing;
use crate::stats::RunStats;
use serde::{Deserialize, Serialize};
use url::Url;

/// Soft reasons only annotate a listing; hard reasons exclude it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hard,
    Soft,
}

/// One failed predicate. The code is a short snake_case tag, with the
/// violated threshold baked in where it has one (`small_capacity_<22`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterReason {
    pub code: String,
    pub severity: Severity,
}

impl FilterReason {
    /// Flat label for CSV cells and prompt text; soft reasons carry a
    /// `_soft` suffix so they read the same way downstream.
    pub fn label(&self) -> String {
        match self.severity {
            Severity::Hard => self.code.clone(),
            Severity::Soft => format!("{}_soft", self.code),
        }
    }
}

/// Equipment tags are matched case-insensitively against these substrings.
const INTERNET_TAGS: [&str; 3] = ["inter", "wi-fi", "wifi"];
const SHARED_ROOM_TAGS: [&str; 1] = ["společenská místnost"];
const PARKING_TAGS: [&str; 1] = ["parko"];
const GRILL_TAGS: [&str; 1] = ["gril"];

fn filter_out(listing: &mut Listing, stats: &mut RunStats, code: String, severity: Severity) {
    let reason = FilterReason { code, severity };
    stats.incr(&format!("filtered_{}", reason.label()));
    if severity == Severity::Hard {
        listing.filtered = true;
    }
    listing.filtered_reasons.insert(reason);
}

fn is_equipment_present(wanted: &[&str], listing: &Listing) -> bool {
    listing.equipment.iter().any(|equip| {
        let equip = equip.to_lowercase();
        wanted.iter().any(|w| equip.contains(w))
    })
}

fn area_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let first = parsed.path_segments()?.next()?;
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// Evaluate every predicate against one listing. The predicates are
/// independent: each failure records its own reason, nothing short-circuits,
/// and the same (listing, limits) input always yields the same reason set.
pub fn evaluate(listing: &mut Listing, limits: &FilterLimits, stats: &mut RunStats) {
    if let Some(gps) = &listing.gps {
        stats.incr("gps_present");
        if let Some(east) = gps.east() {
            if east > limits.max_longitude_e {
                filter_out(listing, stats, "too_much_east".to_string(), Severity::Hard);
            }
        }
    }

    if listing.apartment {
        filter_out(listing, stats, "apartman".to_string(), Severity::Hard);
    }

    match listing.capacity {
        None => filter_out(
            listing,
            stats,
            "capacity_missing".to_string(),
            Severity::Hard,
        ),
        Some(capacity) if capacity < limits.min_beds => filter_out(
            listing,
            stats,
            format!("small_capacity_<{}", limits.min_beds),
            Severity::Hard,
        ),
        Some(capacity) if capacity > limits.max_beds => filter_out(
            listing,
            stats,
            format!("too_big_>{}", limits.max_beds),
            Severity::Hard,
        ),
        Some(_) => {}
    }

    match listing.rooms {
        None | Some(0) => filter_out(listing, stats, "missing_rooms".to_string(), Severity::Hard),
        Some(rooms) if rooms < limits.min_rooms => filter_out(
            listing,
            stats,
            format!("not_enough_rooms_<{}", limits.min_rooms),
            Severity::Hard,
        ),
        Some(_) => {}
    }

    match listing.restaurant_distance_m {
        None => filter_out(
            listing,
            stats,
            "restaurant_distance_invalid".to_string(),
            Severity::Soft,
        ),
        Some(dist) if dist > limits.max_restaurant_distance_m => filter_out(
            listing,
            stats,
            format!(
                "restaurant_distance_too_big_>{}",
                limits.max_restaurant_distance_m as i64
            ),
            Severity::Soft,
        ),
        Some(_) => {}
    }

    if !is_equipment_present(&INTERNET_TAGS, listing) {
        filter_out(listing, stats, "no_internet".to_string(), Severity::Hard);
    }
    if !is_equipment_present(&SHARED_ROOM_TAGS, listing) {
        filter_out(listing, stats, "no_shared_room".to_string(), Severity::Hard);
    }
    if !is_equipment_present(&PARKING_TAGS, listing) {
        filter_out(listing, stats, "no_parking".to_string(), Severity::Hard);
    }
    if !is_equipment_present(&GRILL_TAGS, listing) {
        filter_out(listing, stats, "no_grill".to_string(), Severity::Soft);
    }

    if let Some(price) = listing.price_per_day {
        if price > limits.max_price {
            filter_out(listing, stats, "expensive".to_string(), Severity::Hard);
        }
    }

    listing.area = area_of(&listing.url);
    if let Some(area) = &listing.area {
        if limits.blocked_areas.iter().any(|blocked| blocked == area) {
            filter_out(
                listing,
                stats,
                "blocklisted_area".to_string(),
                Severity::Hard,
            );
        }
    }
}

/// Run the filter over the whole batch and count the exclusions.
pub fn apply_filters(listings: &mut [Listing], limits: &FilterLimits, stats: &mut RunStats) {
    for listing in listings.iter_mut() {
        evaluate(listing, limits, stats);
    }
    for listing in listings.iter() {
        if listing.filtered {
            stats.incr("filtered");
        }
    }
}
