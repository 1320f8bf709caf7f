//! Insight synthesis: generated insights when usable, a composed fallback
//! otherwise.

use insightdeck_core::{ExtractedMetric, MetricUnit};
use insightdeck_llm::TextGenerator;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{StageFailure, StageResult};
use crate::prompts;
use crate::stage::{Enhanced, OrFallback};

pub const INSIGHT_SUFFIX: &str = " [AI-powered analysis with local processing]";

/// Cleaned generated insights shorter than this are discarded.
const MIN_INSIGHT_CHARS: usize = 30;
const MIN_LINE_CHARS: usize = 20;
const MAX_INSIGHTS: usize = 3;

static NUMBERING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("numbering pattern compiles"));
static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-•*]\s*").expect("bullet pattern compiles"));

/// Insights for an analysis, always ending in [`INSIGHT_SUFFIX`].
pub async fn synthesize(
    generator: &dyn TextGenerator,
    keywords: &[String],
    metrics: &[ExtractedMetric],
    summary: &str,
) -> Enhanced<String> {
    let mut insights = generate_insights(generator, keywords, metrics, summary)
        .await
        .or_fallback("insights", || fallback_insights(keywords, metrics, summary));
    insights.value.push_str(INSIGHT_SUFFIX);
    insights
}

async fn generate_insights(
    generator: &dyn TextGenerator,
    keywords: &[String],
    metrics: &[ExtractedMetric],
    summary: &str,
) -> StageResult<String> {
    let prompt = prompts::insights(keywords, metrics, summary);
    let raw = generator
        .generate(&prompt, Some(prompts::INSIGHTS_MAX_TOKENS))
        .await?;
    let cleaned = clean_insights(&raw);
    let chars = cleaned.chars().count();
    if chars < MIN_INSIGHT_CHARS {
        return Err(StageFailure::TooShort { chars });
    }
    Ok(cleaned)
}

/// Strip numbering and bullets, drop short and heading lines, keep three.
pub fn clean_insights(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_LINE_CHARS)
        .map(|line| {
            let line = NUMBERING.replace(line, "");
            BULLET.replace(&line, "").into_owned()
        })
        .filter(|line| !line.is_empty() && !line.to_lowercase().starts_with("insight"))
        .take(MAX_INSIGHTS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic insights from the extracted data.
pub fn fallback_insights(keywords: &[String], metrics: &[ExtractedMetric], summary: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(primary) = keywords.first() {
        parts.push(format!(
            "Document analysis indicates primary focus on {} and related strategic initiatives.",
            primary
        ));
    }

    if !metrics.is_empty() {
        let count = metrics.len();
        let financial = metrics.iter().any(|m| {
            let name = m.name.to_lowercase();
            m.unit == MetricUnit::Currency
                || m.value.contains('$')
                || name.contains("revenue")
                || name.contains("sales")
        });
        if financial {
            parts.push(format!(
                "Financial performance tracking evidenced through {} quantitative metric(s), suggesting data-driven management approach.",
                count
            ));
        } else {
            parts.push(format!(
                "Operational metrics tracking with {} key performance indicator(s) identified.",
                count
            ));
        }
    }

    if summary.chars().count() > 100 {
        let lower = summary.to_lowercase();
        let sentence = if ["growth", "increase", "expansion"].iter().any(|w| lower.contains(w)) {
            "Business trajectory shows growth-oriented strategic direction."
        } else if ["efficiency", "optimization", "improvement"].iter().any(|w| lower.contains(w)) {
            "Operational focus emphasizes efficiency and process optimization."
        } else {
            "Document content supports a balanced review of current business priorities."
        };
        parts.push(sentence.to_string());
    }

    if parts.is_empty() {
        return "Business document contains structured analytical content suitable for strategic review."
            .to_string();
    }
    parts.join(" ")
}
