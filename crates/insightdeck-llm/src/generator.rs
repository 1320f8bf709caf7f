//! Text generation trait and backend selection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ServerlessGenerator;
use crate::config::GenerationConfig;
use crate::types::{GenerationFailure, GenerationOutcome};

/// Trait for text generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`. `max_tokens` of `None` uses the
    /// backend default.
    async fn generate(&self, prompt: &str, max_tokens: Option<usize>) -> GenerationOutcome;

    /// Whether the backend can attempt generation at all.
    fn is_configured(&self) -> bool;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}

/// Backend used when no credentials are available; every call fails fast.
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: Option<usize>) -> GenerationOutcome {
        Err(GenerationFailure::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

/// Create the best available generator for this config.
pub fn create_generator(config: GenerationConfig) -> Arc<dyn TextGenerator> {
    if config.is_configured() {
        tracing::info!("Using serverless generation backend at {}", config.base_url);
        return Arc::new(ServerlessGenerator::new(config));
    }

    tracing::warn!(
        "RUNPOD_API_KEY or RUNPOD_ENDPOINT_ID not set. AI enhancement disabled, pattern extraction only."
    );
    Arc::new(UnconfiguredGenerator)
}
