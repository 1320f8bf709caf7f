//! Fallback combinator for AI-backed stages.

use insightdeck_llm::GenerationFailure;
use tracing::{debug, warn};

use crate::error::{StageFailure, StageResult};

/// A stage value and whether generation produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhanced<T> {
    pub value: T,
    pub from_ai: bool,
}

impl<T> Enhanced<T> {
    pub fn ai(value: T) -> Self {
        Self { value, from_ai: true }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            from_ai: false,
        }
    }
}

pub trait OrFallback<T> {
    /// Keep the stage value, or log the failure and run `fallback`.
    fn or_fallback<F>(self, stage: &str, fallback: F) -> Enhanced<T>
    where
        F: FnOnce() -> T;
}

impl<T> OrFallback<T> for StageResult<T> {
    fn or_fallback<F>(self, stage: &str, fallback: F) -> Enhanced<T>
    where
        F: FnOnce() -> T,
    {
        match self {
            Ok(value) => Enhanced::ai(value),
            Err(StageFailure::Generation(GenerationFailure::NotConfigured)) => {
                debug!("{}: generation not configured, using fallback", stage);
                Enhanced::fallback(fallback())
            }
            Err(e) => {
                warn!("{}: {}, using fallback", stage, e);
                Enhanced::fallback(fallback())
            }
        }
    }
}
