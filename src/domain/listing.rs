// src/domain/listing.rs

use crate::filter::FilterReason;
use crate::stats::NumericStats;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// GPS coordinates as scraped (the directory prints them as decimal strings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gps {
    #[serde(rename = "N")]
    pub n: String,
    #[serde(rename = "E")]
    pub e: String,
}

impl Gps {
    /// Longitude (east) as a number, when the scraped string parses.
    pub fn east(&self) -> Option<f64> {
        self.e.parse().ok()
    }
}

// listing
//  ├── raw (scraped once per run)
//  │    ├── id / name / locality / url
//  │    ├── capacity / rooms
//  │    ├── icons / equipment / pricelist
//  │    ├── distances [(place, free text)]
//  │    ├── ratings / numeric_ratings
//  │    └── gps / images / text / contacts
//  └── derived (recomputed on every `process` run)
//       ├── homepage, distances_map
//       ├── *_distance_m, price_per_day
//       ├── apartment / half_board / breakfast
//       ├── rating_stats, area
//       └── filtered, filtered_reasons

/// One scraped vacation-rental property. Raw fields come straight from the
/// listing page; derived fields are filled in by the normalizer and the
/// filter and are recomputed from the raw fields on every run.
///
/// `id` is the directory's own object number and is stable across runs; it
/// is the join key between the scrape output and the ratings store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub url: String,
    pub id: String,
    pub name: String,
    pub locality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    #[serde(default)]
    pub icons: Vec<String>,
    #[serde(default)]
    pub contact_raw: String,
    #[serde(default)]
    pub contact_links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    /// (place name, free-text distance) pairs, in page order.
    #[serde(default)]
    pub distances: Vec<(String, String)>,
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Raw review texts. The directory shows a random subset on the listing
    /// page; we keep whatever was visible at scrape time.
    #[serde(default)]
    pub ratings: Vec<String>,
    /// Overall review percentages (0-100) scraped from the review blocks.
    #[serde(default)]
    pub numeric_ratings: Vec<i64>,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub pricelist: Vec<String>,
    /// (title, image url) pairs from the thumbnail gallery.
    #[serde(default)]
    pub images: Vec<(Option<String>, String)>,
    /// Full text of the listing block, used by the ranker prompt.
    #[serde(default)]
    pub text: String,
    #[serde(rename = "GPS", default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<Gps>,

    // --- derived fields below ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Lowercased place name -> free-text distance.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub distances_map: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forest_distance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_distance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_distance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub apartment: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub half_board: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub breakfast: bool,
    /// Normalized price: per day, for the whole object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_stats: Option<NumericStats>,
    /// First path segment of the listing URL, the directory's region slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub filtered: bool,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub filtered_reasons: BTreeSet<FilterReason>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Listing {
    /// A blank listing with only identity fields set. Raw collections start
    /// empty and derived fields unset.
    pub fn new(url: String, id: String, name: String, locality: String) -> Self {
        Listing {
            url,
            id,
            name,
            locality,
            capacity: None,
            rooms: None,
            icons: Vec::new(),
            contact_raw: String::new(),
            contact_links: Vec::new(),
            map_link: None,
            distances: Vec::new(),
            equipment: Vec::new(),
            ratings: Vec::new(),
            numeric_ratings: Vec::new(),
            place: String::new(),
            pricelist: Vec::new(),
            images: Vec::new(),
            text: String::new(),
            gps: None,
            homepage: None,
            distances_map: BTreeMap::new(),
            forest_distance_m: None,
            restaurant_distance_m: None,
            shop_distance_m: None,
            apartment: false,
            half_board: false,
            breakfast: false,
            price_per_day: None,
            rating_stats: None,
            area: None,
            filtered: false,
            filtered_reasons: BTreeSet::new(),
        }
    }
}
