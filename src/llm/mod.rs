//! Text generation for onboarding drafts.
//!
//! One backend: an Ollama-style `/api/generate` endpoint reached over plain
//! HTTP POST. The [`TextGenerator`] trait is the seam agents depend on so
//! tests can run without a network.

mod client;

pub use client::{GenerationClient, GenerationRequest, NO_RESPONSE_FALLBACK};

use async_trait::async_trait;

use crate::error::LlmError;

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Run one generation. No retries.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Generate text for `prompt`, never failing.
///
/// Every error is folded into the returned string so it can be shown in
/// place of the draft: non-200 replies read `API Error {status}: {body}`,
/// everything else reads `An error occurred: {e}`.
pub async fn respond(generator: &dyn TextGenerator, prompt: &str) -> String {
    match generator.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(model = generator.model_name(), error = %e, "Generation failed");
            describe_error(&e)
        }
    }
}

/// Render a generation error the way it is shown to the user.
pub fn describe_error(error: &LlmError) -> String {
    match error {
        LlmError::Api { .. } => error.to_string(),
        other => format!("An error occurred: {other}"),
    }
}
