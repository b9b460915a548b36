// src/ranker/client.rs

use crate::errors::PipelineError;
use crate::ranker::SuitabilityModel;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Local Ollama text-generation endpoint. Generation on CPU-sized models
/// is slow, hence the generous timeout.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

fn no_images(images: &&[String]) -> bool {
    images.is_empty()
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "no_images")]
    images: &'a [String],
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

}

impl SuitabilityModel for OllamaClient {
    fn generate(&self, prompt: &str, images: &[String]) -> Result<String, PipelineError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            images,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PipelineError::Llm(format!("HTTP {status}: {body}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| PipelineError::Llm(format!("bad generate response: {e}")))?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_without_empty_images() {
        let request = GenerateRequest {
            model: "llama3.1",
            prompt: "rate this",
            stream: false,
            images: &[],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.1");
        assert_eq!(json["stream"], false);
        assert!(json.get("images").is_none());
    }

    #[test]
    fn request_carries_images_when_present() {
        let images = vec!["aGVsbG8=".to_string()];
        let request = GenerateRequest {
            model: "llava:34b",
            prompt: "rate this",
            stream: false,
            images: &images,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["images"][0], "aGVsbG8=");
    }
}
