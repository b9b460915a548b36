// src/export/rated_csv.rs

use crate::errors::PipelineError;
use crate::store::RatingsStore;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Join the processed CSV with the ratings store into `out-rated.csv`.
/// Object payloads flatten to `{rater}_{field}` columns, scalar payloads
/// keep the rater name as the column. The output header is the union of
/// every key seen, sorted.
pub fn export_rated_csv(
    csv_path: &Path,
    ratings: &RatingsStore,
    output: &Path,
) -> Result<(), PipelineError> {
    let mut reader = csv::Reader::from_path(csv_path)
        .map_err(|e| PipelineError::MissingInput(format!("{}: {e}", csv_path.display())))?;
    let headers = reader.headers()?.clone();

    let mut rows: Vec<BTreeMap<String, String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, c)| (h.to_string(), c.to_string()))
            .collect();

        if let Some(listing_ratings) = row.get("id").and_then(|id| ratings.get(id)) {
            for (rater, payload) in listing_ratings {
                match payload {
                    Value::Object(fields) => {
                        for (field, value) in fields {
                            row.insert(format!("{rater}_{field}"), cell(value));
                        }
                    }
                    other => {
                        row.insert(rater.clone(), cell(other));
                    }
                }
            }
        }
        rows.push(row);
    }

    let fieldnames: BTreeSet<String> = rows
        .iter()
        .flat_map(|row| row.keys().cloned())
        .collect();
    let fieldnames: Vec<String> = fieldnames.into_iter().collect();

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(&fieldnames)?;
    for row in &rows {
        let record: Vec<&str> = fieldnames
            .iter()
            .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
