//! Final pass every analysis goes through, including error paths.
//!
//! Fills defaults for missing fields and enforces the output bounds:
//! keyword length and count, metric name length, metric dedup and count,
//! plot validity and count.

use insightdeck_core::analysis::{
    normalize_metric_name, MAX_KEYWORDS, MAX_METRICS, MAX_METRIC_NAME_CHARS, MAX_PLOTS,
};
use insightdeck_core::{truncate_chars, AnalysisDraft, AnalysisResult, ExtractedMetric, PlotDescriptor};

pub const DEFAULT_SUMMARY: &str = "Business analysis completed successfully";
pub const DEFAULT_INSIGHTS: &str = "Business insights extracted using local AI processing";
pub const DEFAULT_MARKET_POSITION: &str = "Analysis completed with advanced AI capabilities";
pub const DEFAULT_ADVANTAGES: &[&str] = &["AI-Powered Analysis", "Secure Local Processing"];
pub const DEFAULT_SUCCESS_INDICATORS: &[&str] =
    &["Local Processing", "Data Security", "Business Intelligence"];

const KEYWORD_CHARS: std::ops::RangeInclusive<usize> = 3..=25;

pub fn normalize(draft: AnalysisDraft) -> AnalysisResult {
    AnalysisResult {
        summary: text_or(draft.summary, DEFAULT_SUMMARY),
        keywords: normalize_keywords(draft.keywords.unwrap_or_default()),
        metrics: normalize_metrics(draft.metrics.unwrap_or_default()),
        insights: text_or(draft.insights, DEFAULT_INSIGHTS),
        plot_data: normalize_plots(draft.plot_data.unwrap_or_default()),
        competitive_advantages: list_or(draft.competitive_advantages, DEFAULT_ADVANTAGES),
        market_position: text_or(draft.market_position, DEFAULT_MARKET_POSITION),
        success_indicators: list_or(draft.success_indicators, DEFAULT_SUCCESS_INDICATORS),
        processed_locally: true,
        processed_with_ai: draft.processed_with_ai,
        timestamp: chrono::Utc::now().to_rfc3339(),
        fallback: draft.fallback.then_some(true),
        error: draft.error.filter(|e| !e.trim().is_empty()),
    }
}

fn text_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn list_or(value: Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    let items: Vec<String> = value
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if items.is_empty() {
        default.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.trim();
        if !KEYWORD_CHARS.contains(&keyword.chars().count()) {
            continue;
        }
        if out.iter().any(|k| k == keyword) {
            continue;
        }
        out.push(keyword.to_string());
        if out.len() == MAX_KEYWORDS {
            break;
        }
    }
    out
}

fn normalize_metrics(metrics: Vec<ExtractedMetric>) -> Vec<ExtractedMetric> {
    let mut seen = std::collections::HashSet::new();
    metrics
        .into_iter()
        .filter_map(|mut metric| {
            let name = truncate_chars(metric.name.trim(), MAX_METRIC_NAME_CHARS)
                .trim()
                .to_string();
            let value = metric.value.trim().to_string();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            metric.name = name;
            metric.value = value;
            Some(metric)
        })
        .filter(|metric| seen.insert(normalize_metric_name(&metric.name)))
        .take(MAX_METRICS)
        .collect()
}

fn normalize_plots(plots: Vec<PlotDescriptor>) -> Vec<PlotDescriptor> {
    plots
        .into_iter()
        .filter(PlotDescriptor::is_valid)
        .take(MAX_PLOTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightdeck_core::{ChartKind, MetricCategory, MetricUnit};

    fn metric(name: &str, value: &str) -> ExtractedMetric {
        ExtractedMetric::new(name, value, MetricUnit::Unspecified, MetricCategory::General)
    }

    #[test]
    fn test_empty_draft_gets_defaults() {
        let result = normalize(AnalysisDraft::default());
        assert_eq!(result.summary, DEFAULT_SUMMARY);
        assert_eq!(result.insights, DEFAULT_INSIGHTS);
        assert_eq!(result.market_position, DEFAULT_MARKET_POSITION);
        assert_eq!(result.competitive_advantages, DEFAULT_ADVANTAGES);
        assert_eq!(result.success_indicators, DEFAULT_SUCCESS_INDICATORS);
        assert!(result.keywords.is_empty());
        assert!(result.processed_locally);
        assert!(!result.processed_with_ai);
        assert!(result.fallback.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&result.timestamp).is_ok());
    }

    #[test]
    fn test_blank_strings_are_absent() {
        let draft = AnalysisDraft {
            summary: Some("   ".into()),
            market_position: Some(String::new()),
            competitive_advantages: Some(vec![" ".into()]),
            ..AnalysisDraft::default()
        };
        let result = normalize(draft);
        assert_eq!(result.summary, DEFAULT_SUMMARY);
        assert_eq!(result.market_position, DEFAULT_MARKET_POSITION);
        assert_eq!(result.competitive_advantages, DEFAULT_ADVANTAGES);
    }

    #[test]
    fn test_bounds_enforced() {
        let mut keywords: Vec<String> = vec!["ai".into(), "a keyword that is far too long to keep".into()];
        keywords.extend((0..15).map(|i| format!("keyword{}", i)));

        let mut metrics = vec![
            metric("Revenue", "$5M"),
            metric("revenue ", "$6M"),
            metric("", "1"),
            metric(&"N".repeat(80), "2"),
        ];
        metrics.extend((0..10).map(|i| metric(&format!("Metric {}", i), "1")));

        let good = PlotDescriptor {
            title: "Topics".into(),
            kind: ChartKind::Bar,
            labels: vec!["a".into(), "b".into()],
            values: vec![1, 2],
        };
        let bad = PlotDescriptor {
            values: vec![1],
            ..good.clone()
        };

        let result = normalize(AnalysisDraft {
            keywords: Some(keywords),
            metrics: Some(metrics),
            plot_data: Some(vec![bad, good.clone(), good.clone(), good]),
            ..AnalysisDraft::default()
        });

        assert_eq!(result.keywords.len(), 10);
        assert_eq!(result.keywords[0], "keyword0");
        assert!(result.keywords.iter().all(|k| (3..=25).contains(&k.chars().count())));

        assert_eq!(result.metrics.len(), 8);
        assert_eq!(result.metrics[0].value, "$5M");
        assert_eq!(result.metrics[1].name.chars().count(), 50);
        assert!(result.metrics.iter().all(|m| !m.name.is_empty()));

        assert_eq!(result.plot_data.len(), 2);
        assert!(result.plot_data.iter().all(PlotDescriptor::is_valid));
    }

    #[test]
    fn test_idempotent_apart_from_timestamp() {
        let draft = AnalysisDraft {
            summary: Some("Summary".into()),
            keywords: Some(vec!["revenue".into(), "x".into()]),
            metrics: Some(vec![metric("Revenue", "$5M"), metric("REVENUE", "$6M")]),
            processed_with_ai: true,
            fallback: true,
            error: Some("boom".into()),
            ..AnalysisDraft::default()
        };
        let once = normalize(draft);
        let mut twice = normalize(AnalysisDraft::from(once.clone()));
        twice.timestamp = once.timestamp.clone();
        assert_eq!(once, twice);
        assert_eq!(once.fallback, Some(true));
        assert_eq!(once.error.as_deref(), Some("boom"));
    }
}
