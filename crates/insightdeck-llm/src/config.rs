//! Generation backend configuration: optional JSON file, then env vars.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.runpod.ai/v2";
pub const DEFAULT_MAX_TOKENS: usize = 1000;

/// Serverless generation endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoint_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_poll_interval_ms() -> u64 {
    4_000
}
fn default_max_polls() -> u32 {
    60
}
fn default_submit_timeout_secs() -> u64 {
    30
}
fn default_status_timeout_secs() -> u64 {
    15
}
fn default_temperature() -> f64 {
    0.7
}
fn default_top_p() -> f64 {
    0.9
}
fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint_id: None,
            api_key: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
            submit_timeout_secs: default_submit_timeout_secs(),
            status_timeout_secs: default_status_timeout_secs(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl GenerationConfig {
    /// Load config from an optional file, falling back to env vars and defaults.
    pub fn load(config_path: Option<&Path>) -> Self {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`GenerationConfig::load`] with an explicit env lookup.
    pub fn load_with<F>(config_path: Option<&Path>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(raw) => match serde_json::from_str::<GenerationConfig>(&raw) {
                    Ok(config) => {
                        info!("Loaded generation config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        warn!("Ignoring malformed generation config {}: {}", path.display(), e);
                        GenerationConfig::default()
                    }
                },
                Err(_) => GenerationConfig::default(),
            },
            None => GenerationConfig::default(),
        };

        // Env vars as fallback
        if config.api_key.is_none() {
            config.api_key = lookup("RUNPOD_API_KEY").filter(|v| !v.trim().is_empty());
        }
        if config.endpoint_id.is_none() {
            config.endpoint_id = lookup("RUNPOD_ENDPOINT_ID").filter(|v| !v.trim().is_empty());
        }
        if let Some(url) = lookup("RUNPOD_BASE_URL").filter(|v| !v.trim().is_empty()) {
            if config.base_url == DEFAULT_BASE_URL {
                config.base_url = url;
            }
        }

        config
    }

    /// Whether both credentials needed to submit a job are present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.endpoint_id.is_some()
    }

    pub fn run_url(&self, endpoint_id: &str) -> String {
        format!("{}/{}/run", self.base_url.trim_end_matches('/'), endpoint_id)
    }

    pub fn status_url(&self, endpoint_id: &str, job_id: &str) -> String {
        format!(
            "{}/{}/status/{}",
            self.base_url.trim_end_matches('/'),
            endpoint_id,
            job_id
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }
}
