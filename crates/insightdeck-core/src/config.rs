//! Service configuration and per-request analysis options.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5001;
/// Legacy chunking budget (characters per chunk).
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
/// Texts shorter than this are never split, even in chunked mode.
pub const DEFAULT_CHUNK_THRESHOLD: usize = 2_000;
/// Characters of source text embedded in the summary-enhancement prompt.
pub const DEFAULT_PROMPT_CHAR_BUDGET: usize = 2_500;

/// Options read once at the start of a request and passed into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Legacy mode: split into word-bounded chunks and analyze each.
    pub chunking: bool,
    pub chunk_size: usize,
    pub chunk_threshold: usize,
    pub prompt_char_budget: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            chunking: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            prompt_char_budget: DEFAULT_PROMPT_CHAR_BUDGET,
        }
    }
}

impl AnalysisOptions {
    /// Human-readable processing mode, as reported by the status endpoints.
    pub fn mode(&self) -> &'static str {
        if self.chunking {
            "chunked"
        } else {
            "full_document"
        }
    }
}

/// Top-level InsightDeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// HTTP server port.
    pub port: u16,
    /// Initial analysis options; chunking may be toggled at runtime.
    pub analysis: AnalysisOptions,
}

impl InsightConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mut analysis = AnalysisOptions::default();

        if let Some(raw) = lookup("INSIGHTDECK_CHUNKING") {
            analysis.chunking = parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!("INSIGHTDECK_CHUNKING must be a boolean, got {:?}", raw))
            })?;
        }

        if let Some(raw) = lookup("INSIGHTDECK_CHUNK_SIZE") {
            let size: usize = raw.trim().parse().map_err(|_| {
                Error::Config(format!("INSIGHTDECK_CHUNK_SIZE must be a number, got {:?}", raw))
            })?;
            if size == 0 {
                return Err(Error::Config("INSIGHTDECK_CHUNK_SIZE must be positive".into()));
            }
            analysis.chunk_size = size;
        }

        Ok(Self { port, analysis })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = InsightConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.analysis.chunking);
        assert_eq!(config.analysis.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.analysis.mode(), "full_document");
    }

    #[test]
    fn test_env_overrides() {
        let config = InsightConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("INSIGHTDECK_CHUNKING", "yes"),
            ("INSIGHTDECK_CHUNK_SIZE", "4000"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.analysis.chunking);
        assert_eq!(config.analysis.chunk_size, 4000);
        assert_eq!(config.analysis.mode(), "chunked");
    }

    #[test]
    fn test_invalid_chunk_size() {
        let err = InsightConfig::from_lookup(lookup_from(&[("INSIGHTDECK_CHUNK_SIZE", "0")]));
        assert!(matches!(err, Err(Error::Config(_))));

        let err = InsightConfig::from_lookup(lookup_from(&[("INSIGHTDECK_CHUNK_SIZE", "big")]));
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_flag() {
        let err = InsightConfig::from_lookup(lookup_from(&[("INSIGHTDECK_CHUNKING", "maybe")]));
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
