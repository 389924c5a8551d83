//! Thin HTTP client for the Gemini `generateContent` endpoint.
//!
//! [`GenerativeModel`] is the seam the generator talks to; [`GeminiClient`] is
//! the reqwest-backed implementation used in production.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::gemini::types::{build_request_body, decode_response, GenerateContentResponse, Part};

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Submit an ordered list of parts and return the decoded reply.
    async fn generate_content(&self, parts: Vec<Part>) -> AppResult<GenerateContentResponse>;

    fn model_name(&self) -> &str;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("Gemini API key is required".to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;
        let base = base_url.trim_end_matches('/').to_string();
        Ok(GeminiClient { client, base_url: base, model, api_key })
    }

    pub fn from_config(config: &crate::Config) -> AppResult<Self> {
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
            config.gemini_timeout,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(&self, parts: Vec<Part>) -> AppResult<GenerateContentResponse> {
        let url = self.endpoint();
        let body = build_request_body(&parts);
        tracing::info!("Sending request to Gemini model {} ({} parts)", self.model, parts.len());

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| AppError::Config(format!("Invalid API key header: {}", e)))?;
        let response = self.client.post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Unable to read error body".to_string());
            let truncated: String = error_body.chars().take(200).collect();
            tracing::error!("Gemini API error. Status: {}, Body: {}", status, truncated);
            return Err(AppError::Transport(format!("Gemini API returned status {}", status)));
        }

        let raw: Value = response.json().await?;
        decode_response(raw)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
