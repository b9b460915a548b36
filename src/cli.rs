// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cottage-rental pipeline: scrape the directory, normalize and filter
/// the listings, export them, and optionally rank the survivors with a
/// local LLM. Subcommands are re-runnable in any order; they only talk
/// to each other through the files they read and write.
#[derive(Debug, Parser)]
#[command(name = "cabin_scout", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl the directory and write raw listings as JSON lines.
    Scrape {
        #[arg(long, default_value = "properties.jsonl")]
        output: PathBuf,
        /// Minimum capacity passed to the directory's search form.
        #[arg(long, default_value_t = 18)]
        capacity: u32,
        /// Minimum room count passed to the directory's search form.
        #[arg(long, default_value_t = 2)]
        rooms: u32,
    },
    /// Normalize, filter and export the scraped listings.
    Process {
        #[arg(long, default_value = "properties.jsonl")]
        input: PathBuf,
        #[arg(long, default_value = "out.csv")]
        csv: PathBuf,
        #[arg(long, default_value = "out.json")]
        json: PathBuf,
    },
    /// Rate non-filtered listings with a local Ollama model.
    Rank {
        #[arg(long, default_value = "out.json")]
        input: PathBuf,
        #[arg(long, default_value = "ratings.json")]
        ratings: PathBuf,
        #[arg(long, default_value = "llama3.1")]
        model: String,
        #[arg(long, default_value = "v2")]
        prompt_version: String,
        /// Attach cached listing images to the generate request.
        #[arg(long)]
        images: bool,
        #[arg(long, default_value = "imgs")]
        images_dir: PathBuf,
        #[arg(long, default_value = "http://localhost:11434")]
        ollama_url: String,
        /// Reference listings the prompt compares candidates against,
        /// matched by case-insensitive name substring.
        #[arg(long, default_value = "drevníky resort slapy")]
        first_reference: String,
        #[arg(long, default_value = "chalupa simia")]
        second_reference: String,
    },
    /// Download listing images into the cache directory.
    Images {
        #[arg(long, default_value = "out.json")]
        input: PathBuf,
        #[arg(long, default_value = "imgs")]
        dir: PathBuf,
    },
    /// Join the processed CSV with the ratings store.
    MergeRatings {
        #[arg(long, default_value = "out.csv")]
        csv: PathBuf,
        #[arg(long, default_value = "ratings.json")]
        ratings: PathBuf,
        #[arg(long, default_value = "out-rated.csv")]
        output: PathBuf,
    },
    /// Import a human-ratings CSV into the ratings store.
    AddManualRatings {
        /// CSV with an `id` column; every other column names a rater.
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "ratings.json")]
        ratings: PathBuf,
    },
}
