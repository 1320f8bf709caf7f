//! Scripted generators for stage and analyzer tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use insightdeck_llm::{GenerationFailure, GenerationOutcome, TextGenerator};

/// Answers each prompt with the reply of the first rule whose needle the
/// prompt contains; unmatched prompts fail.
pub struct ScriptedGenerator {
    rules: Vec<(&'static str, GenerationOutcome)>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn reply(mut self, needle: &'static str, text: &str) -> Self {
        self.rules.push((needle, Ok(text.to_string())));
        self
    }

    pub fn fail(mut self, needle: &'static str, failure: GenerationFailure) -> Self {
        self.rules.push((needle, Err(failure)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _max_tokens: Option<usize>) -> GenerationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or(Err(GenerationFailure::JobFailed("unscripted prompt".into())))
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Configured backend whose every call fails.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: Option<usize>) -> GenerationOutcome {
        Err(GenerationFailure::Timeout { polls: 60 })
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Backend that panics mid-analysis.
pub struct PanickingGenerator;

#[async_trait]
impl TextGenerator for PanickingGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: Option<usize>) -> GenerationOutcome {
        panic!("backend exploded");
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}
