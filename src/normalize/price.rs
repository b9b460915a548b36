// src/normalize/price.rs

use crate::domain::Listing;
use crate::stats::RunStats;
use regex::Regex;
use std::sync::OnceLock;

fn price_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+\.? ?\d+)\s?(?:,\-)?Kč").unwrap())
}

/// Pull the first currency amount out of a pricelist line.
/// Dots and spaces inside the number are thousands separators.
fn extract_price_amount(line: &str) -> Option<i64> {
    let captures = price_regex().captures(line)?;
    captures[1].replace(['.', ' '], "").parse().ok()
}

/// Normalize the pricelist into a per-day, per-object price.
///
/// Line 0 is the header and decides the unit of every following line.
/// Among the season lines only "let*" (summer) and "mimo*" (off-season)
/// entries count; a "cen*" line opens the next section, meaning the first
/// section had no usable price. Header adjustments apply in source order:
/// per-week divides by 7, per-person multiplies by capacity, per-room by
/// rooms — a header naming several applies several, and the priority of
/// that overlap is kept exactly as found.
///
/// TODO: iterate the remaining pricelist sections instead of only the
/// first; telling apart listings priced exclusively per person needs them.
pub fn extract_normalized_price(listing: &mut Listing, stats: &mut RunStats) {
    if listing.pricelist.is_empty() {
        stats.incr("pricelist_missing");
        return;
    }

    let header = listing.pricelist[0].clone();
    if header.contains("apartmán") {
        // apartments are excluded by the filter, no point pricing them
        listing.apartment = true;
        return;
    }
    if header.contains("polop") {
        listing.half_board = true;
        stats.incr("half_board");
    }
    if header.contains("snídaní") {
        listing.breakfast = true;
        stats.incr("breakfast");
    }

    let mut price: Option<i64> = None;
    for candidate in &listing.pricelist[1..] {
        let lower = candidate.to_lowercase();
        if lower.starts_with("cen") {
            // next price section starts here; the first one had no price
            break;
        }
        if !(lower.starts_with("let") || lower.starts_with("mimo")) {
            continue;
        }
        match extract_price_amount(candidate) {
            Some(amount) => {
                price = Some(amount);
                break;
            }
            None => {
                stats.incr("idiotic_price_format");
                continue;
            }
        }
    }

    let Some(amount) = price else {
        stats.incr("price_not_found");
        return;
    };

    let mut amount = amount as f64;
    if header.contains("za týden") {
        amount /= 7.0;
    }
    if header.contains("za osobu") {
        let Some(capacity) = listing.capacity else {
            return;
        };
        amount *= capacity as f64;
    }
    if header.contains("pokoj") {
        let Some(rooms) = listing.rooms else {
            return;
        };
        amount *= rooms as f64;
    }

    listing.price_per_day = Some(amount.round() as i64);
    stats.prices.push(amount);
}
