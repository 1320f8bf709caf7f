//! InsightDeck Extract — deterministic extraction and AI output grounding.
//!
//! Everything here is pure: no network, no shared state. The pattern
//! extractor always produces a usable baseline; the response parser and
//! grounding check turn untrusted generated text into metric candidates.

pub mod chunking;
pub mod extract;
pub mod grounding;
pub mod response;
pub mod text;

pub use chunking::chunk_words;
pub use extract::{extract, PatternExtraction};
pub use grounding::{candidate_to_metric, validate_candidates};
pub use response::{parse_keyword_list, parse_metric_lines};
