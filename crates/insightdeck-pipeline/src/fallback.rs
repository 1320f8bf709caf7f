//! Minimal result for inputs the pipeline could not process.

use insightdeck_core::{truncate_chars, AnalysisDraft, AnalysisResult};
use insightdeck_extract::text::long_sentences;

use crate::normalize::normalize;

const CANNED_SUMMARY: &str =
    "Sensitive document processed locally. Detailed analysis unavailable due to formatting issues.";
const MIN_TEXT_CHARS: usize = 100;
const MIN_SENTENCE_CHARS: usize = 30;
const MAX_SUMMARY_CHARS: usize = 300;

/// Build the fallback result for `text`, keeping `error` in the output.
pub fn fallback_result(text: &str, error: &str) -> AnalysisResult {
    let summary = if text.chars().count() > MIN_TEXT_CHARS {
        long_sentences(text, MIN_SENTENCE_CHARS)
            .first()
            .map(|s| format!("{}...", truncate_chars(s, MAX_SUMMARY_CHARS)))
    } else {
        None
    }
    .unwrap_or_else(|| CANNED_SUMMARY.to_string());

    normalize(AnalysisDraft {
        summary: Some(summary.clone()),
        keywords: Some(Vec::new()),
        metrics: Some(Vec::new()),
        insights: Some(summary),
        plot_data: Some(Vec::new()),
        competitive_advantages: Some(vec!["Secure Local Processing".into()]),
        market_position: Some("Sensitive data processed locally.".into()),
        success_indicators: Some(vec!["Local Processing".into()]),
        processed_with_ai: false,
        fallback: true,
        error: Some(error.to_string()),
    })
}
