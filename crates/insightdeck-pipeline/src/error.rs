//! Stage failures. None of these reach the caller; each stage has a fallback.

use insightdeck_llm::GenerationFailure;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageFailure {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    #[error("generated text looks incomplete ({chars} chars)")]
    Incomplete { chars: usize },

    #[error("generated text too short ({chars} chars)")]
    TooShort { chars: usize },

    #[error("no usable candidates in generated text")]
    NoCandidates,

    #[error("no valid plot lines in generated text")]
    NoValidPlots,
}

pub type StageResult<T> = std::result::Result<T, StageFailure>;
