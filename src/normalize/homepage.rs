// src/normalize/homepage.rs

use crate::domain::Listing;
use crate::stats::RunStats;
use std::collections::BTreeSet;

/// Guess the owner's homepage from the contact links: dedup them, drop the
/// `#` placeholder, ignore facebook, and accept only an unambiguous single
/// survivor. Also normalizes `contact_links` itself (deduped, no `#`).
pub fn add_homepage(listing: &mut Listing, stats: &mut RunStats) {
    let deduped: BTreeSet<String> = listing
        .contact_links
        .iter()
        .filter(|link| link.as_str() != "#")
        .cloned()
        .collect();
    listing.contact_links = deduped.into_iter().collect();

    let candidates: Vec<&String> = listing
        .contact_links
        .iter()
        .filter(|link| !link.contains("face"))
        .collect();

    if candidates.len() == 1 {
        listing.homepage = Some(candidates[0].clone());
        stats.incr("homepage_present");
    } else if candidates.len() > 1 {
        stats.incr("too_many_links_for_homepage_detection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_with_links(links: &[&str]) -> Listing {
        let mut listing = Listing::new(
            "https://www.example.cz/krkonose/chata-3.php".to_string(),
            "3".to_string(),
            "Chata".to_string(),
            "Pec".to_string(),
        );
        listing.contact_links = links.iter().map(|s| s.to_string()).collect();
        listing
    }

    #[test]
    fn single_link_becomes_homepage() {
        let mut listing = listing_with_links(&["http://www.chata.cz", "#"]);
        let mut stats = RunStats::new();

        add_homepage(&mut listing, &mut stats);

        assert_eq!(listing.homepage.as_deref(), Some("http://www.chata.cz"));
        assert_eq!(stats.count("homepage_present"), 1);
    }

    #[test]
    fn facebook_links_do_not_count() {
        let mut listing = listing_with_links(&[
            "https://www.facebook.com/chata",
            "http://www.chata.cz",
        ]);
        let mut stats = RunStats::new();

        add_homepage(&mut listing, &mut stats);

        assert_eq!(listing.homepage.as_deref(), Some("http://www.chata.cz"));
    }

    #[test]
    fn several_candidates_stay_ambiguous() {
        let mut listing = listing_with_links(&["http://www.a.cz", "http://www.b.cz"]);
        let mut stats = RunStats::new();

        add_homepage(&mut listing, &mut stats);

        assert!(listing.homepage.is_none());
        assert_eq!(stats.count("too_many_links_for_homepage_detection"), 1);
    }

    #[test]
    fn duplicate_links_are_merged_first() {
        let mut listing =
            listing_with_links(&["http://www.chata.cz", "http://www.chata.cz", "#"]);
        let mut stats = RunStats::new();

        add_homepage(&mut listing, &mut stats);

        assert_eq!(listing.contact_links.len(), 1);
        assert_eq!(listing.homepage.as_deref(), Some("http://www.chata.cz"));
    }
}
