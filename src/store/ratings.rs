// src/store/ratings.rs

use crate::errors::PipelineError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Cross-run rating cache: listing id -> rater name -> payload.
/// Raters are humans or `{model}_{prompt_version}` keys; payloads are
/// schemaless JSON so both kinds coexist in one file.
pub type RatingsStore = BTreeMap<String, BTreeMap<String, Value>>;

/// Load `ratings.json`. The file is a cache: when it does not exist yet,
/// start from an empty store instead of failing.
pub fn load_ratings(path: &Path) -> Result<RatingsStore, PipelineError> {
    match File::open(path) {
        Ok(file) => Ok(serde_json::from_reader(BufReader::new(file))?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RatingsStore::new()),
        Err(e) => Err(e.into()),
    }
}

/// Rewrite the whole store. Called after every new rating so a crashed
/// ranking run keeps everything rated so far.
pub fn save_ratings(path: &Path, store: &RatingsStore) -> Result<(), PipelineError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, store)?;
    Ok(())
}

/// True when the listing already holds a rating under this rater key.
pub fn is_already_rated(store: &RatingsStore, listing_id: &str, rater: &str) -> bool {
    store
        .get(listing_id)
        .map(|ratings| ratings.contains_key(rater))
        .unwrap_or(false)
}

pub fn insert_rating(store: &mut RatingsStore, listing_id: &str, rater: &str, payload: Value) {
    store
        .entry(listing_id.to_string())
        .or_default()
        .insert(rater.to_string(), payload);
}

/// Import human ratings from a CSV. The `id` column joins on the listing;
/// a `"{rater} {field}"` column nests its cell under the rater's payload
/// object, a plain `"{rater}"` column stores the cell verbatim. Returns
/// the number of rows imported.
pub fn import_manual_csv(
    csv_path: &Path,
    store: &mut RatingsStore,
) -> Result<usize, PipelineError> {
    let file = File::open(csv_path)
        .map_err(|e| PipelineError::MissingInput(format!("{}: {e}", csv_path.display())))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let headers = reader.headers()?.clone();

    let mut imported = 0;
    for record in reader.records() {
        let record = record?;
        let Some(id) = headers
            .iter()
            .position(|h| h == "id")
            .and_then(|idx| record.get(idx))
        else {
            continue;
        };
        let id = id.to_string();
        if id.is_empty() {
            continue;
        }

        for (header, cell) in headers.iter().zip(record.iter()) {
            if header == "id" || cell.is_empty() {
                continue;
            }
            match header.split_once(' ') {
                Some((rater, field)) => {
                    let ratings = store.entry(id.clone()).or_default();
                    let payload = ratings
                        .entry(rater.to_string())
                        .or_insert_with(|| Value::Object(Default::default()));
                    if let Value::Object(map) = payload {
                        map.insert(field.to_string(), Value::String(cell.to_string()));
                    }
                }
                None => {
                    insert_rating(store, &id, header, Value::String(cell.to_string()));
                }
            }
        }
        imported += 1;
    }
    Ok(imported)
}
