mod distance;
mod homepage;
mod price;
mod ratings;

pub use distance::{add_distances, distances_to_map};
pub use homepage::add_homepage;
pub use price::extract_normalized_price;
pub use ratings::ratings_stats;

use crate::domain::Listing;
use crate::stats::RunStats;

/// Derive every computed field from the raw scrape, in a fixed order.
/// Idempotent over re-runs: everything derived starts from raw fields only.
pub fn enhance(listings: &mut [Listing], stats: &mut RunStats) {
    for listing in listings.iter_mut() {
        add_homepage(listing, stats);
        ratings_stats(listing, stats);
        distances_to_map(listing);
        add_distances(listing, stats);
        extract_normalized_price(listing, stats);
    }
}
