//! Grounding checks for generated metric candidates.
//!
//! A candidate `"name: value"` is kept only if the source text mentions a
//! variant of its name or contains one of its numbers verbatim. Numbers are
//! not bound to names: any verbatim number is enough.

use insightdeck_core::analysis::MAX_METRIC_NAME_CHARS;
use insightdeck_core::{truncate_chars, ExtractedMetric, MetricCategory, MetricUnit};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::text::NUMBER_PATTERN;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NUMBER_PATTERN).expect("number pattern compiles"));

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Name keywords → category, checked in order.
const CATEGORY_HINTS: &[(&[&str], MetricCategory)] = &[
    (
        &["revenue", "profit", "income", "earnings", "sales", "cost", "valuation", "funding", "margin", "ebitda"],
        MetricCategory::Financial,
    ),
    (&["market", "share", "competitor"], MetricCategory::Market),
    (
        &["customer", "retention", "satisfaction", "client", "user", "churn", "nps"],
        MetricCategory::Customer,
    ),
    (
        &["efficiency", "productivity", "employee", "headcount", "location", "operational", "savings"],
        MetricCategory::Operational,
    ),
    (
        &["r&d", "research", "innovation", "patent", "product", "launch", "technology"],
        MetricCategory::Innovation,
    ),
    (&["growth", "performance", "rate"], MetricCategory::Performance),
];

/// Keep the candidates that have textual support in `source`, in order.
pub fn validate_candidates(candidates: &[String], source: &str) -> Vec<String> {
    let source_lower = source.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| {
            let grounded = is_grounded(candidate, source, &source_lower);
            if !grounded {
                debug!("Dropping ungrounded metric candidate: {}", candidate);
            }
            grounded
        })
        .cloned()
        .collect()
}

fn is_grounded(candidate: &str, source: &str, source_lower: &str) -> bool {
    let Some((name, value)) = candidate.split_once(':') else {
        return false;
    };

    let name_found = name_variants(name)
        .iter()
        .filter(|v| v.chars().count() > 2)
        .any(|v| source_lower.contains(v.as_str()));

    let number_found = NUMBER_RE
        .find_iter(value)
        .any(|m| source.contains(m.as_str()));

    name_found || number_found
}

/// Full name, first word, and the name with `rate` / `count` removed.
fn name_variants(name: &str) -> Vec<String> {
    let lower = name.trim().to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let joined = words.join(" ");
    let first = words.first().map(|w| w.to_string()).unwrap_or_default();
    let stripped = lower.replace("rate", "").replace("count", "").trim().to_string();
    vec![lower.clone(), joined, first, stripped]
}

/// Convert an accepted `"name: value"` candidate into a metric, inferring
/// unit from the value and category from the name.
pub fn candidate_to_metric(candidate: &str) -> Option<ExtractedMetric> {
    let (name, value) = candidate.split_once(':')?;
    let name = truncate_chars(name.trim(), MAX_METRIC_NAME_CHARS).trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        return None;
    }

    let unit = if value.contains(CURRENCY_SYMBOLS) {
        MetricUnit::Currency
    } else if value.contains('%') {
        MetricUnit::Percentage
    } else {
        MetricUnit::Unspecified
    };

    Some(ExtractedMetric::new(name, value, unit, infer_category(name)))
}

fn infer_category(name: &str) -> MetricCategory {
    let lower = name.to_lowercase();
    CATEGORY_HINTS
        .iter()
        .find(|(hints, _)| hints.iter().any(|h| lower.contains(h)))
        .map(|(_, category)| *category)
        .unwrap_or_default()
}
