//! Submit-then-poll client for a serverless generation endpoint.
//!
//! A job is submitted once, then its status URL is polled at a fixed
//! interval. Non-200 polls and unknown statuses keep polling; `COMPLETED`
//! yields the generated text, `FAILED` or exhausting the poll budget yields
//! a failure.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GenerationConfig;
use crate::generator::TextGenerator;
use crate::types::{
    GenerationFailure, GenerationOutcome, JobInput, JobRequest, JobStatus, StatusResponse,
    SubmitResponse,
};

pub struct ServerlessGenerator {
    client: Client,
    config: GenerationConfig,
}

impl ServerlessGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    async fn submit(
        &self,
        endpoint_id: &str,
        api_key: &str,
        prompt: &str,
        max_tokens: usize,
    ) -> Result<String, GenerationFailure> {
        let body = JobRequest {
            input: JobInput {
                prompt,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                max_tokens,
            },
        };

        let response = self
            .client
            .post(self.config.run_url(endpoint_id))
            .bearer_auth(api_key)
            .timeout(self.config.submit_timeout())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationFailure::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Job submission failed: {} - {}", status, body);
            return Err(GenerationFailure::SubmitRejected { status, body });
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| GenerationFailure::Request(e.to_string()))?;

        submitted
            .id
            .filter(|id| !id.is_empty())
            .ok_or(GenerationFailure::MissingJobId)
    }

    async fn poll(&self, endpoint_id: &str, api_key: &str, job_id: &str) -> GenerationOutcome {
        let status_url = self.config.status_url(endpoint_id, job_id);
        let max_polls = self.config.max_polls;

        for attempt in 1..=max_polls {
            debug!("Polling job {} ({}/{})", job_id, attempt, max_polls);

            let response = self
                .client
                .get(&status_url)
                .bearer_auth(api_key)
                .timeout(self.config.status_timeout())
                .send()
                .await
                .map_err(|e| GenerationFailure::Request(e.to_string()))?;

            if !response.status().is_success() {
                warn!("Status check failed: {}", response.status());
            } else {
                match response.json::<StatusResponse>().await {
                    Ok(status) => match status.status {
                        JobStatus::Completed => return completed_output(status.output),
                        JobStatus::Failed => {
                            let message = status.error_message();
                            warn!("Job {} failed: {}", job_id, message);
                            return Err(GenerationFailure::JobFailed(message));
                        }
                        JobStatus::InQueue | JobStatus::InProgress => {}
                        JobStatus::Unknown => warn!("Unknown job status for {}", job_id),
                    },
                    Err(e) => warn!("Unreadable status response for {}: {}", job_id, e),
                }
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }

        warn!("Job {} timed out after {} polls", job_id, max_polls);
        Err(GenerationFailure::Timeout { polls: max_polls })
    }
}

#[async_trait]
impl TextGenerator for ServerlessGenerator {
    async fn generate(&self, prompt: &str, max_tokens: Option<usize>) -> GenerationOutcome {
        let (Some(endpoint_id), Some(api_key)) =
            (self.config.endpoint_id.as_deref(), self.config.api_key.as_deref())
        else {
            return Err(GenerationFailure::NotConfigured);
        };

        let max_tokens = max_tokens.unwrap_or(self.config.max_tokens);
        let preview: String = prompt.chars().take(50).collect();
        info!("Submitting generation job: {}...", preview);

        let job_id = self.submit(endpoint_id, api_key, prompt, max_tokens).await?;
        let text = self.poll(endpoint_id, api_key, &job_id).await?;
        info!("Generation job completed ({} chars)", text.chars().count());
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn name(&self) -> &'static str {
        "serverless"
    }
}

fn completed_output(output: Option<Value>) -> GenerationOutcome {
    let output = output
        .filter(|v| !is_empty_value(v))
        .ok_or(GenerationFailure::EmptyOutput)?;
    let text = extract_generated_text(&output);
    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationFailure::EmptyOutput);
    }
    Ok(text.to_string())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Pull the generated text out of a job's `output` value.
///
/// Recognized shapes, in order: `[{"choices": [{"tokens": ["..."]}]}]`,
/// `{"text": "..."}`, `{"generated_text": "..."}`, a bare string. Anything
/// else is rendered as JSON.
pub fn extract_generated_text(output: &Value) -> String {
    if let Some(token) = output
        .get(0)
        .and_then(|item| item.get("choices"))
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("tokens"))
        .and_then(|tokens| tokens.get(0))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    {
        return token.to_string();
    }

    match output {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("text")
            .or_else(|| map.get("generated_text"))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| output.to_string()),
        other => other.to_string(),
    }
}
