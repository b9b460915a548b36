// src/export/csv_export.rs

use crate::domain::Listing;
use crate::errors::PipelineError;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Columns a human reads first, in this order. Every other key discovered
/// on any record follows, sorted.
pub const PREFERRED_COLUMNS: [&str; 16] = [
    "name",
    "locality",
    "capacity",
    "rooms",
    "price_per_day",
    "homepage",
    "url",
    "breakfast",
    "half_board",
    "rating_mean",
    "rating_median",
    "rating_samples",
    "forest_distance_m",
    "restaurant_distance_m",
    "shop_distance_m",
    "filtered",
];

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // nested values stay inspectable as compact JSON
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Flatten one listing into CSV cells: the bulky page text is dropped,
/// rating stats gain flat mean/median/samples columns, and the reason set
/// becomes a comma-joined label list.
fn listing_row(listing: &Listing) -> Result<BTreeMap<String, String>, PipelineError> {
    let value = serde_json::to_value(listing)?;
    let Value::Object(mut obj) = value else {
        return Err(PipelineError::Json("listing did not serialize to an object".to_string()));
    };

    obj.remove("text");

    if let Some(stats) = &listing.rating_stats {
        obj.insert("rating_mean".to_string(), Value::from(stats.mean));
        obj.insert("rating_median".to_string(), Value::from(stats.median));
        obj.insert("rating_samples".to_string(), Value::from(stats.samples));
    }

    if !listing.filtered_reasons.is_empty() {
        let labels: Vec<String> = listing.filtered_reasons.iter().map(|r| r.label()).collect();
        obj.insert("filtered_reasons".to_string(), Value::String(labels.join(",")));
    }

    Ok(obj
        .iter()
        .map(|(key, value)| (key.clone(), value_to_cell(value)))
        .collect())
}

/// Build the header: preferred columns first, then every remaining
/// discovered key, sorted. Each key appears exactly once.
fn header_for(rows: &[BTreeMap<String, String>]) -> Vec<String> {
    let mut header: Vec<String> = PREFERRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let discovered: BTreeSet<&String> = rows.iter().flat_map(|row| row.keys()).collect();
    for key in discovered {
        if !PREFERRED_COLUMNS.contains(&key.as_str()) {
            header.push(key.clone());
        }
    }
    header
}

pub fn export_csv(path: &Path, listings: &[Listing]) -> Result<(), PipelineError> {
    let rows: Result<Vec<_>, _> = listings.iter().map(listing_row).collect();
    let rows = rows?;
    let header = header_for(&rows);

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;
    for row in &rows {
        let record: Vec<&str> = header
            .iter()
            .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
