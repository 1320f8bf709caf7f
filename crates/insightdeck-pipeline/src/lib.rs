//! Analysis pipeline — pattern baseline, AI enhancement, normalization.
//!
//! Stages return `StageResult` and are composed with [`OrFallback`], so a
//! failed generation only ever downgrades a single field to its fallback.

pub mod analyzer;
pub mod error;
pub mod fallback;
pub mod insights;
pub mod normalize;
pub mod plots;
pub mod prompts;
pub mod stage;

#[cfg(test)]
mod test_support;

pub use analyzer::{analyze_isolated, Analyzer};
pub use error::{StageFailure, StageResult};
pub use fallback::fallback_result;
pub use normalize::normalize;
pub use stage::{Enhanced, OrFallback};
