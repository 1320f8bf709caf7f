//! Wire types for the serverless job API and generation failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why a generation call produced no text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("generation backend is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(String),

    #[error("job submission rejected with status {status}: {body}")]
    SubmitRejected { status: u16, body: String },

    #[error("no job id in submission response")]
    MissingJobId,

    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job completed without output")]
    EmptyOutput,

    #[error("job did not complete after {polls} polls")]
    Timeout { polls: u32 },
}

/// Generated text, or the reason there is none.
pub type GenerationOutcome = std::result::Result<String, GenerationFailure>;

/// Job lifecycle status reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    InQueue,
    InProgress,
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Body posted to the run endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct JobRequest<'a> {
    pub input: JobInput<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobInput<'a> {
    pub prompt: &'a str,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: usize,
}

/// Response of the run endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response of the status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl StatusResponse {
    /// Job error message, if the backend gave one.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "Unknown error".to_string(),
            Some(other) => other.to_string(),
        }
    }
}
