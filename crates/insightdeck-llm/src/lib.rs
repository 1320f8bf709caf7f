//! Text generation for AI enhancement of analyses.
//!
//! Generation goes to a remote serverless endpoint using a submit-then-poll
//! job API. Without credentials an unconfigured backend is used and every
//! call fails fast, so callers fall back to pattern extraction.

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod generator;
pub mod types;

pub use client::{extract_generated_text, ServerlessGenerator};
pub use config::GenerationConfig;
pub use diagnostics::{run_canary, CanaryReport, CANARY_PROMPT};
pub use generator::{create_generator, TextGenerator, UnconfiguredGenerator};
pub use types::{GenerationFailure, GenerationOutcome, JobStatus};
