// errors.rs
use std::fmt;

/// Errors originating from pipeline I/O and downstream services
/// (file stores, CSV, the LLM endpoint). Scrape-layer errors have
/// their own type in `scraper::ScraperError`.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Json(String),
    Csv(String),
    Network(String),
    Llm(String),
    MissingInput(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(msg) => write!(f, "I/O error: {msg}"),
            PipelineError::Json(msg) => write!(f, "JSON error: {msg}"),
            PipelineError::Csv(msg) => write!(f, "CSV error: {msg}"),
            PipelineError::Network(msg) => write!(f, "Network error: {msg}"),
            PipelineError::Llm(msg) => write!(f, "LLM error: {msg}"),
            PipelineError::MissingInput(msg) => write!(f, "Missing input: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Json(e.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::Csv(e.to_string())
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        PipelineError::Network(e.to_string())
    }
}
