//! HTTP client for the `/api/generate` endpoint.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use tracing::debug;

use super::TextGenerator;
use crate::config::GenerationConfig;
use crate::error::LlmError;

/// Returned when a 200 reply carries no `response` field.
pub const NO_RESPONSE_FALLBACK: &str = "No response found in the API output.";

/// Request body sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub temperature: f32,
    pub stream: bool,
    pub model: String,
    pub prompt: String,
}

/// Non-streaming generation client. No timeout is configured, so a call
/// blocks until the endpoint answers or the connection fails.
pub struct GenerationClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl GenerationClient {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Build the JSON body for `prompt`.
    pub fn request_for(&self, prompt: &str) -> GenerationRequest {
        GenerationRequest {
            temperature: self.config.temperature,
            stream: false,
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = self.request_for(prompt);
        debug!(
            model = %body.model,
            prompt_chars = body.prompt.chars().count(),
            "Sending generation request"
        );

        let resp = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let parsed: serde_json::Value = serde_json::from_str(&text)?;
        let content = extract_response(&parsed);
        debug!(response_chars = content.chars().count(), "Generation complete");
        Ok(content)
    }
}

/// Pull the `response` field out of a reply body.
fn extract_response(body: &serde_json::Value) -> String {
    match body.get("response") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => NO_RESPONSE_FALLBACK.to_string(),
        Some(other) => other.to_string(),
    }
}
