//! Canary prompt for checking the generation backend end to end.

use serde::Serialize;

use crate::generator::TextGenerator;

pub const CANARY_PROMPT: &str = "Respond with: generation backend working correctly";
const ERROR_SENTINEL: &str = "Error:";

/// Result of one canary round-trip.
#[derive(Debug, Clone, Serialize)]
pub struct CanaryReport {
    pub test_prompt: String,
    pub result: String,
    pub success: bool,
    pub result_length: usize,
    pub timestamp: String,
}

/// Send the canary prompt. Success needs more than 5 non-blank characters
/// and no `Error:` sentinel in the reply.
pub async fn run_canary(generator: &dyn TextGenerator) -> CanaryReport {
    let (result, success) = match generator.generate(CANARY_PROMPT, None).await {
        Ok(text) => {
            let ok = text.trim().chars().count() > 5 && !text.contains(ERROR_SENTINEL);
            (text, ok)
        }
        Err(failure) => (format!("Error: {}", failure), false),
    };

    CanaryReport {
        test_prompt: CANARY_PROMPT.to_string(),
        result_length: result.chars().count(),
        result,
        success,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::UnconfiguredGenerator;
    use crate::types::GenerationOutcome;
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, _prompt: &str, _max_tokens: Option<usize>) -> GenerationOutcome {
            Ok(self.0.to_string())
        }
        fn is_configured(&self) -> bool {
            true
        }
        fn name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_canary_success() {
        let report = run_canary(&Echo("generation backend working correctly")).await;
        assert!(report.success);
        assert_eq!(report.test_prompt, CANARY_PROMPT);
        assert_eq!(report.result_length, 36);
    }

    #[tokio::test]
    async fn test_canary_short_reply_is_failure() {
        assert!(!run_canary(&Echo("ok")).await.success);
    }

    #[tokio::test]
    async fn test_canary_error_reply_is_failure() {
        let report = run_canary(&Echo("Error: model worker unavailable")).await;
        assert!(!report.success);
        assert_eq!(report.result, "Error: model worker unavailable");
    }

    #[tokio::test]
    async fn test_canary_unconfigured() {
        let report = run_canary(&UnconfiguredGenerator).await;
        assert!(!report.success);
        assert!(report.result.starts_with("Error: "));
    }
}
