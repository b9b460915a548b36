// src/store/listings.rs

use crate::domain::Listing;
use crate::errors::PipelineError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Load the scrape output: one JSON listing per line. A missing file is
/// fatal here, the pipeline has nothing to work on without it.
pub fn load_jsonl(path: &Path) -> Result<Vec<Listing>, PipelineError> {
    let file = File::open(path)
        .map_err(|e| PipelineError::MissingInput(format!("{}: {e}", path.display())))?;
    let reader = BufReader::new(file);

    let mut listings = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        listings.push(serde_json::from_str(&line)?);
    }
    Ok(listings)
}

/// Write listings as line-delimited JSON, rewriting the file wholesale.
pub fn save_jsonl(path: &Path, listings: &[Listing]) -> Result<(), PipelineError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for listing in listings {
        serde_json::to_writer(&mut writer, listing)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the enriched batch as one JSON array (`out.json`), the input to
/// the ranker and the image downloader.
pub fn save_json_array(path: &Path, listings: &[Listing]) -> Result<(), PipelineError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, listings)?;
    Ok(())
}

pub fn load_json_array(path: &Path) -> Result<Vec<Listing>, PipelineError> {
    let file = File::open(path)
        .map_err(|e| PipelineError::MissingInput(format!("{}: {e}", path.display())))?;
    let listings = serde_json::from_reader(BufReader::new(file))?;
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("cabin_scout_{name}_{nanos}"))
    }

    fn sample_listing(id: &str) -> Listing {
        let mut listing = Listing::new(
            format!("https://www.example.cz/krkonose/chata-{id}.php"),
            id.to_string(),
            format!("Chata {id}"),
            "Vrchlabí".to_string(),
        );
        listing.capacity = Some(24);
        listing.equipment = vec!["Wi-Fi".to_string()];
        listing
    }

    #[test]
    fn jsonl_round_trip() {
        let path = temp_path("listings.jsonl");
        let listings = vec![sample_listing("1"), sample_listing("2")];

        save_jsonl(&path, &listings).unwrap();
        let loaded = load_jsonl(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "1");
        assert_eq!(loaded[1].name, "Chata 2");
        assert_eq!(loaded[0].capacity, Some(24));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn json_array_round_trip() {
        let path = temp_path("out.json");
        let listings = vec![sample_listing("7")];

        save_json_array(&path, &listings).unwrap();
        let loaded = load_json_array(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "7");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_input_is_reported_as_such() {
        let err = load_jsonl(Path::new("/nonexistent/properties.jsonl")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
    }
}
