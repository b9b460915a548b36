// src/normalize/ratings.rs

use crate::domain::Listing;
use crate::stats::{numeric_stats, RunStats};

/// Aggregate the scraped review percentages into `rating_stats` and feed
/// the run-level accumulator. Listings without reviews are left untouched.
pub fn ratings_stats(listing: &mut Listing, stats: &mut RunStats) {
    if listing.numeric_ratings.is_empty() {
        return;
    }
    let samples: Vec<f64> = listing.numeric_ratings.iter().map(|&r| r as f64).collect();
    listing.rating_stats = numeric_stats(&samples);
    stats.ratings.extend_from_slice(&samples);
    stats.incr("rating_present");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_with_ratings(ratings: &[i64]) -> Listing {
        let mut listing = Listing::new(
            "https://www.example.cz/sumava/chata-2.php".to_string(),
            "2".to_string(),
            "Chata".to_string(),
            "Kvilda".to_string(),
        );
        listing.numeric_ratings = ratings.to_vec();
        listing
    }

    #[test]
    fn stats_computed_from_review_percentages() {
        let mut listing = listing_with_ratings(&[80, 90, 100]);
        let mut stats = RunStats::new();

        ratings_stats(&mut listing, &mut stats);

        let rating_stats = listing.rating_stats.unwrap();
        assert_eq!(rating_stats.mean, 90.0);
        assert_eq!(rating_stats.median, 90.0);
        assert_eq!(rating_stats.samples, 3);
        assert_eq!(stats.count("rating_present"), 1);
        assert_eq!(stats.ratings.len(), 3);
    }

    #[test]
    fn no_reviews_no_stats() {
        let mut listing = listing_with_ratings(&[]);
        let mut stats = RunStats::new();

        ratings_stats(&mut listing, &mut stats);

        assert!(listing.rating_stats.is_none());
        assert_eq!(stats.count("rating_present"), 0);
    }
}
