mod client;
mod prompt;

pub use client::OllamaClient;
pub use prompt::{build_prompt, format_listing};

use crate::domain::Listing;
use crate::errors::PipelineError;
use crate::store::{insert_rating, is_already_rated, save_ratings, RatingsStore};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Seam over the text-generation service so the rank loop can be driven
/// by a stub in tests. Images are base64-encoded file contents.
pub trait SuitabilityModel {
    fn generate(&self, prompt: &str, images: &[String]) -> Result<String, PipelineError>;
}

/// The JSON object the prompt demands from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingPayload {
    pub rating: f64,
    pub description: String,
    pub owner_in_house: bool,
    pub explanation: String,
}

pub struct RankOptions {
    pub model: String,
    pub prompt_version: String,
    pub include_images: bool,
    pub images_dir: PathBuf,
    pub first_reference: String,
    pub second_reference: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct RankSummary {
    pub rated: usize,
    pub skipped_cached: usize,
    pub failed: usize,
}

/// Models wrap the JSON in code fences more often than not; peel those
/// and a leading `json` tag before parsing.
pub fn clean_model_response(raw: &str) -> String {
    let cleaned = raw.replace("```", "");
    let cleaned = cleaned.trim();
    cleaned
        .strip_prefix("json")
        .map(str::trim)
        .unwrap_or(cleaned)
        .to_string()
}

fn find_by_name<'a>(name: &str, listings: &[&'a Listing]) -> Option<&'a Listing> {
    let name = name.to_lowercase();
    listings
        .iter()
        .find(|listing| listing.name.to_lowercase().contains(&name))
        .copied()
}

/// Base64-encode the cached image files of a listing. Images that were
/// never downloaded are skipped with a warning; ranking continues.
fn encode_cached_images(listing: &Listing, images_dir: &Path) -> Vec<String> {
    let mut encoded = Vec::new();
    for (_, image_url) in &listing.images {
        let filename = urlencoding::encode(image_url).into_owned();
        let path = images_dir.join(filename);
        match std::fs::read(&path) {
            Ok(bytes) => encoded.push(BASE64.encode(bytes)),
            Err(e) => eprintln!("⚠️ image {} unavailable: {e}", path.display()),
        }
    }
    encoded
}

/// Rank every non-filtered listing against the two reference properties.
/// Listings already rated under the `{model}_{prompt_version}` key are
/// skipped without touching the service; each fresh rating is persisted
/// immediately so an interrupted run loses nothing.
pub fn rank_listings(
    listings: &[Listing],
    store: &mut RatingsStore,
    model: &impl SuitabilityModel,
    opts: &RankOptions,
    ratings_path: &Path,
) -> Result<RankSummary, PipelineError> {
    let candidates: Vec<&Listing> = listings.iter().filter(|l| !l.filtered).collect();
    println!("loaded {} objects", listings.len());
    println!("filtered to {} objects", candidates.len());

    let first = find_by_name(&opts.first_reference, &candidates).ok_or_else(|| {
        PipelineError::MissingInput(format!("reference listing '{}'", opts.first_reference))
    })?;
    let second = find_by_name(&opts.second_reference, &candidates).ok_or_else(|| {
        PipelineError::MissingInput(format!("reference listing '{}'", opts.second_reference))
    })?;

    let first_block = format_listing(first);
    let second_block = format_listing(second);
    let rater_key = format!("{}_{}", opts.model, opts.prompt_version);

    let mut summary = RankSummary::default();
    let total = candidates.len();
    let mut processed = 0;

    for listing in &candidates {
        println!("{} {}", listing.name, listing.url);

        if is_already_rated(store, &listing.id, &rater_key) {
            println!(
                "already rated with {} and prompt {} skip",
                opts.model, opts.prompt_version
            );
            summary.skipped_cached += 1;
            processed += 1;
            println!("{processed}/{total}");
            continue;
        }

        let prompt = build_prompt(
            &opts.prompt_version,
            &first_block,
            &second_block,
            &format_listing(listing),
            opts.include_images,
        )
        .ok_or_else(|| {
            PipelineError::MissingInput(format!("prompt version '{}'", opts.prompt_version))
        })?;

        let images = if opts.include_images {
            encode_cached_images(listing, &opts.images_dir)
        } else {
            Vec::new()
        };

        match model.generate(&prompt, &images) {
            Ok(raw) => {
                let cleaned = clean_model_response(&raw);
                match serde_json::from_str::<RatingPayload>(&cleaned) {
                    Ok(payload) => {
                        println!("{}", serde_json::to_string(&payload)?);
                        insert_rating(
                            store,
                            &listing.id,
                            &rater_key,
                            serde_json::to_value(&payload)?,
                        );
                        save_ratings(ratings_path, store)?;
                        summary.rated += 1;
                    }
                    Err(_) => {
                        eprintln!("rating failed");
                        summary.failed += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("rating failed: {e}");
                summary.failed += 1;
            }
        }

        processed += 1;
        println!("{processed}/{total}");
    }

    Ok(summary)
}
