// src/commands.rs

use crate::cli::{Cli, Command};
use crate::config::FilterLimits;
use crate::errors::PipelineError;
use crate::ranker::{rank_listings, OllamaClient, RankOptions};
use crate::scraper::CottageScraper;
use crate::stats::RunStats;
use crate::{export, filter, images, normalize, store};
use std::path::Path;
use std::time::Duration;

pub fn run(cli: Cli) -> Result<(), PipelineError> {
    match cli.command {
        Command::Scrape {
            output,
            capacity,
            rooms,
        } => run_scrape(&output, capacity, rooms),
        Command::Process { input, csv, json } => run_process(&input, &csv, &json),
        Command::Rank {
            input,
            ratings,
            model,
            prompt_version,
            images,
            images_dir,
            ollama_url,
            first_reference,
            second_reference,
        } => run_rank(
            &input,
            &ratings,
            RankOptions {
                model,
                prompt_version,
                include_images: images,
                images_dir,
                first_reference,
                second_reference,
            },
            &ollama_url,
        ),
        Command::Images { input, dir } => run_images(&input, &dir),
        Command::MergeRatings {
            csv,
            ratings,
            output,
        } => run_merge_ratings(&csv, &ratings, &output),
        Command::AddManualRatings { input, ratings } => run_add_manual_ratings(&input, &ratings),
    }
}

fn run_scrape(output: &Path, capacity: u32, rooms: u32) -> Result<(), PipelineError> {
    let started = chrono::Local::now();
    eprintln!("🧵 scrape started at {}", started.format("%Y-%m-%d %H:%M:%S"));

    let scraper = CottageScraper::new().map_err(|e| PipelineError::Network(e.to_string()))?;
    let urls = scraper
        .collect_listing_urls(capacity, rooms)
        .map_err(|e| PipelineError::Network(e.to_string()))?;

    let mut listings = Vec::new();
    for (i, url) in urls.iter().enumerate() {
        eprintln!("📄 [{}/{}] {url}", i + 1, urls.len());
        match scraper.fetch_listing(url) {
            Ok(listing) => listings.push(listing),
            Err(e) => eprintln!("⚠️ skipping {url}: {e}"),
        }
        // be polite to the directory
        std::thread::sleep(Duration::from_secs(2));
    }

    store::save_jsonl(output, &listings)?;

    let finished = chrono::Local::now();
    eprintln!(
        "✅ scraped {} of {} listings in {}s",
        listings.len(),
        urls.len(),
        (finished - started).num_seconds()
    );
    Ok(())
}

fn run_process(input: &Path, csv: &Path, json: &Path) -> Result<(), PipelineError> {
    let mut listings = store::load_jsonl(input)?;
    let mut stats = RunStats::new();
    let limits = FilterLimits::default();

    normalize::enhance(&mut listings, &mut stats);
    filter::apply_filters(&mut listings, &limits, &mut stats);

    stats.report(listings.len());

    export::export_csv(csv, &listings)?;
    store::save_json_array(json, &listings)?;
    Ok(())
}

fn run_rank(
    input: &Path,
    ratings_path: &Path,
    opts: RankOptions,
    ollama_url: &str,
) -> Result<(), PipelineError> {
    let listings = store::load_json_array(input)?;
    let mut ratings = store::load_ratings(ratings_path)?;
    let client = OllamaClient::new(ollama_url, &opts.model)?;

    let summary = rank_listings(&listings, &mut ratings, &client, &opts, ratings_path)?;
    println!(
        "rated {} / cached {} / failed {}",
        summary.rated, summary.skipped_cached, summary.failed
    );
    Ok(())
}

fn run_images(input: &Path, dir: &Path) -> Result<(), PipelineError> {
    let listings = store::load_json_array(input)?;
    images::download_images(&listings, dir)
}

fn run_merge_ratings(csv: &Path, ratings_path: &Path, output: &Path) -> Result<(), PipelineError> {
    let ratings = store::load_ratings(ratings_path)?;
    export::export_rated_csv(csv, &ratings, output)
}

fn run_add_manual_ratings(input: &Path, ratings_path: &Path) -> Result<(), PipelineError> {
    let mut ratings = store::load_ratings(ratings_path)?;
    let imported = store::import_manual_csv(input, &mut ratings)?;
    store::save_ratings(ratings_path, &ratings)?;
    println!("imported {imported} rows into {}", ratings_path.display());
    Ok(())
}
