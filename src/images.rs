// src/images.rs

use crate::domain::Listing;
use crate::errors::PipelineError;
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;

/// Download every listing image into the cache directory. The filename is
/// the URL percent-escaped wholesale, and an existing file is the dedup
/// check, so re-runs only fetch what is missing.
pub fn download_images(listings: &[Listing], dir: &Path) -> Result<(), PipelineError> {
    std::fs::create_dir_all(dir)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    let total = listings.len();
    println!("loaded {total} objects");

    for (i, listing) in listings.iter().enumerate() {
        for (_, image_url) in &listing.images {
            let path = dir.join(cache_filename(image_url));
            if path.exists() {
                continue;
            }
            match fetch_bytes(&client, image_url) {
                Ok(bytes) => std::fs::write(&path, bytes)?,
                Err(e) => eprintln!("⚠️ {image_url} failed: {e}"),
            }
        }
        println!("done {i}/{total}");
    }
    Ok(())
}

pub fn cache_filename(image_url: &str) -> String {
    urlencoding::encode(image_url).into_owned()
}

fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, PipelineError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::Network(format!("HTTP {status}: {url}")));
    }
    Ok(response.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_fully_escaped() {
        let name = cache_filename("https://img.example.cz/chata 1.jpg");

        assert!(!name.contains('/'));
        assert!(!name.contains(':'));
        assert!(!name.contains(' '));
        assert_eq!(
            name,
            "https%3A%2F%2Fimg.example.cz%2Fchata%201.jpg"
        );
    }
}
