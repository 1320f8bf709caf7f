//! Prompt templates and their token limits.

use insightdeck_core::{truncate_chars, ExtractedMetric};

pub const SUMMARY_MAX_TOKENS: usize = 1500;
pub const METRICS_MAX_TOKENS: usize = 200;
pub const SIMPLE_METRICS_MAX_TOKENS: usize = 100;
pub const INSIGHTS_MAX_TOKENS: usize = 180;
pub const PLOTS_MAX_TOKENS: usize = 120;

const METRICS_SOURCE_CHARS: usize = 1500;
const SIMPLE_METRICS_SOURCE_CHARS: usize = 800;
const INSIGHTS_SUMMARY_CHARS: usize = 300;
const CHUNK_SUMMARY_CHARS: usize = 800;
const CHUNK_KEYWORDS_CHARS: usize = 600;
const CHUNK_METRICS_CHARS: usize = 500;

/// Executive summary over the first `budget` characters of the document.
pub fn summary(text: &str, budget: usize) -> String {
    format!(
        "Write a COMPLETE executive summary. Do not stop mid-sentence.

REQUIREMENTS:
- At least 300 words
- End with a period
- Cover financial metrics, market position and growth strategy
- Professional executive tone

DOCUMENT:
{}

Write the complete executive summary now, ending with a period:",
        truncate_chars(text, budget)
    )
}

/// Structured metric extraction, one `Name: Value` per line.
pub fn metrics(text: &str) -> String {
    format!(
        "You are a business analyst preparing an executive briefing.

Find the most important business metrics in the document:
1. Financial: revenue, profit, growth rates, market value
2. Market: market share, competitive position
3. Customer: customer base size, retention, satisfaction
4. Operational: efficiency gains, cost savings, productivity
5. Innovation: R&D investment, product launches

OUTPUT FORMAT, one metric per line:
Metric Name: Value

EXAMPLES:
Annual Revenue: $820.6 million
Market Share: 23.5%
Customer Retention: 94%

Only report numbers that appear in the document.

DOCUMENT:
{}

EXTRACTED BUSINESS METRICS:
1.",
        truncate_chars(text, METRICS_SOURCE_CHARS)
    )
}

/// Simpler metric prompt used when the structured one yields nothing.
pub fn simple_metrics(text: &str) -> String {
    format!(
        "Extract up to 5 key business numbers from this text.
Format each as \"Description: Number\".
Only include numbers that actually appear in the text.

Text: {}

Key numbers:",
        truncate_chars(text, SIMPLE_METRICS_SOURCE_CHARS)
    )
}

/// Strategic insights over the top keywords, metrics and summary.
pub fn insights(keywords: &[String], metrics: &[ExtractedMetric], summary: &str) -> String {
    let keywords_context = if keywords.is_empty() {
        "business operations".to_string()
    } else {
        keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
    };
    let metrics_context = if metrics.is_empty() {
        "No specific metrics extracted".to_string()
    } else {
        metrics
            .iter()
            .take(4)
            .map(|m| format!("- {}: {}", m.name, m.value))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are a senior business consultant reviewing a company document.

ANALYSIS DATA:
Key Focus Areas: {}
Business Metrics:
{}

Document Summary: {}

Provide 2-3 strategic business insights that connect the metrics to business
performance, identify opportunities or concerns, and are specific and actionable.

STRATEGIC INSIGHTS:
1.",
        keywords_context,
        metrics_context,
        truncate_chars(summary, INSIGHTS_SUMMARY_CHARS)
    )
}

/// Two chart suggestions in `Title|type|labels|values` lines.
pub fn plots(keywords: &[String], metrics: &[ExtractedMetric]) -> String {
    let topics = if keywords.is_empty() {
        "General business data".to_string()
    } else {
        keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
    };
    let figures = if metrics.is_empty() {
        "Basic metrics available".to_string()
    } else {
        metrics
            .iter()
            .take(3)
            .map(|m| format!("{}: {}", m.name, m.value))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "You are a data visualization expert. Suggest 2 charts for this business analysis.

Key Topics: {}
Business Metrics: {}

OUTPUT FORMAT (exactly):
Chart1Title|chart_type|label1,label2,label3|value1,value2,value3
Chart2Title|chart_type|label1,label2,label3|value1,value2,value3

CHART TYPES: bar, line, pie

EXAMPLE:
Revenue by Quarter|bar|Q1,Q2,Q3,Q4|120,135,150,180
Market Share|pie|Product A,Product B,Product C|45,35,20

VISUALIZATION SUGGESTIONS:",
        topics, figures
    )
}

pub fn chunk_summary(chunk: &str) -> String {
    format!(
        "Provide a concise 2-3 sentence business summary:\n\n{}\n\nSummary:",
        truncate_chars(chunk, CHUNK_SUMMARY_CHARS)
    )
}

pub fn chunk_keywords(chunk: &str) -> String {
    format!(
        "Extract 5 key business terms. Return only terms separated by commas:\n\n{}\n\nTerms:",
        truncate_chars(chunk, CHUNK_KEYWORDS_CHARS)
    )
}

pub fn chunk_metrics(chunk: &str) -> String {
    format!(
        "List financial numbers and metrics. Format as \"Label: Value\":\n\n{}\n\nMetrics:",
        truncate_chars(chunk, CHUNK_METRICS_CHARS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_respects_budget() {
        let text = "#".repeat(5000);
        let prompt = summary(&text, 2500);
        assert_eq!(prompt.matches('#').count(), 2500);
    }

    #[test]
    fn test_chunk_prompts_truncate() {
        let chunk = "#".repeat(1000);
        assert_eq!(chunk_summary(&chunk).matches('#').count(), 800);
        assert_eq!(chunk_keywords(&chunk).matches('#').count(), 600);
        assert_eq!(chunk_metrics(&chunk).matches('#').count(), 500);
    }

    #[test]
    fn test_insights_defaults() {
        let prompt = insights(&[], &[], "");
        assert!(prompt.contains("Key Focus Areas: business operations"));
        assert!(prompt.contains("No specific metrics extracted"));
    }
}
