//! Chart descriptors from generated suggestions, with a deterministic fallback.

use insightdeck_core::analysis::MAX_PLOTS;
use insightdeck_core::{ChartKind, ExtractedMetric, PlotDescriptor};
use insightdeck_llm::TextGenerator;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{StageFailure, StageResult};
use crate::prompts;
use crate::stage::{Enhanced, OrFallback};

/// Value used when a value field has no number.
const DEFAULT_PLOT_VALUE: i64 = 10;
const TOPIC_VALUES: [i64; 5] = [20, 15, 12, 10, 8];
const FOCUS_VALUES: [i64; 4] = [30, 25, 25, 20];
const MAX_METRIC_BARS: usize = 5;

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern compiles"));

/// Up to two plots for an analysis.
pub async fn build_plots(
    generator: &dyn TextGenerator,
    keywords: &[String],
    metrics: &[ExtractedMetric],
) -> Enhanced<Vec<PlotDescriptor>> {
    generate_plots(generator, keywords, metrics)
        .await
        .or_fallback("plots", || fallback_plots(keywords, metrics))
}

async fn generate_plots(
    generator: &dyn TextGenerator,
    keywords: &[String],
    metrics: &[ExtractedMetric],
) -> StageResult<Vec<PlotDescriptor>> {
    let raw = generator
        .generate(&prompts::plots(keywords, metrics), Some(prompts::PLOTS_MAX_TOKENS))
        .await?;
    let plots = parse_plot_lines(&raw);
    if plots.is_empty() {
        return Err(StageFailure::NoValidPlots);
    }
    Ok(plots)
}

/// Parse `Title|type|l1,l2|v1,v2` lines, keeping at most two valid plots.
pub fn parse_plot_lines(raw: &str) -> Vec<PlotDescriptor> {
    raw.lines()
        .filter_map(|line| {
            let parsed = parse_plot_line(line);
            if parsed.is_none() && line.contains('|') {
                debug!("Rejected plot line: {}", line.trim());
            }
            parsed
        })
        .take(MAX_PLOTS)
        .collect()
}

fn parse_plot_line(line: &str) -> Option<PlotDescriptor> {
    let parts: Vec<&str> = line.trim().split('|').map(str::trim).collect();
    if parts.len() < 4 {
        return None;
    }

    let labels: Vec<String> = parts[2]
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    let values: Vec<i64> = parts[3]
        .split(',')
        .map(|v| {
            FIRST_NUMBER
                .find(v)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .map(|n| n as i64)
                .unwrap_or(DEFAULT_PLOT_VALUE)
        })
        .collect();

    let plot = PlotDescriptor {
        title: parts[0].to_string(),
        kind: ChartKind::parse_lenient(parts[1]),
        labels,
        values,
    };
    plot.is_valid().then_some(plot)
}

/// Plots built straight from the keyword and metric lists.
///
/// Values are synthetic for keyword charts and truncated to the label count.
pub fn fallback_plots(keywords: &[String], metrics: &[ExtractedMetric]) -> Vec<PlotDescriptor> {
    let mut plots = Vec::new();

    if keywords.len() >= 2 {
        let labels: Vec<String> = keywords.iter().take(TOPIC_VALUES.len()).cloned().collect();
        let values = TOPIC_VALUES[..labels.len()].to_vec();
        plots.push(PlotDescriptor {
            title: "Key Topics Analysis".into(),
            kind: ChartKind::Bar,
            labels,
            values,
        });
    }

    if keywords.len() > 3 {
        plots.push(PlotDescriptor {
            title: "Business Focus Areas".into(),
            kind: ChartKind::Pie,
            labels: keywords.iter().take(FOCUS_VALUES.len()).cloned().collect(),
            values: FOCUS_VALUES.to_vec(),
        });
    }

    if keywords.len() < 2 && metrics.len() >= 2 {
        let shown: Vec<&ExtractedMetric> = metrics.iter().take(MAX_METRIC_BARS).collect();
        plots.push(PlotDescriptor {
            title: "Key Metrics Overview".into(),
            kind: ChartKind::Bar,
            labels: shown.iter().map(|m| m.name.clone()).collect(),
            values: shown.iter().map(|m| metric_magnitude(&m.value)).collect(),
        });
    }

    plots.retain(PlotDescriptor::is_valid);
    plots.truncate(MAX_PLOTS);
    plots
}

fn metric_magnitude(value: &str) -> i64 {
    let digits: String = value.chars().filter(|c| *c != ',').collect();
    FIRST_NUMBER
        .find(&digits)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|n| n as i64)
        .unwrap_or(DEFAULT_PLOT_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingGenerator, ScriptedGenerator};
    use insightdeck_core::{MetricCategory, MetricUnit};

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_valid_lines() {
        let raw = "Here are two charts:\n\
                   Revenue by Quarter|bar|Q1,Q2,Q3,Q4|120,135.7,$150M,n/a\n\
                   Market Share|Donut|A,B,C|45,35,20\n\
                   Third Chart|line|x,y|1,2";
        let plots = parse_plot_lines(raw);
        assert_eq!(plots.len(), 2);
        assert_eq!(plots[0].values, vec![120, 135, 150, 10]);
        assert_eq!(plots[0].kind, ChartKind::Bar);
        assert_eq!(plots[1].kind, ChartKind::Bar);
        assert_eq!(plots[1].labels, words(&["A", "B", "C"]));
    }

    #[test]
    fn test_rejects_invalid_lines() {
        // count mismatch, too few labels, too many labels, missing fields, long title
        let long_title = format!("{}|bar|a,b|1,2", "T".repeat(51));
        let raw = format!(
            "Revenue|bar|Q1,Q2|100\nSolo|pie|only|5\nWide|bar|a,b,c,d,e,f,g|1,2,3,4,5,6,7\nNo values|bar|a,b\n{}",
            long_title
        );
        assert!(parse_plot_lines(&raw).is_empty());
    }

    #[tokio::test]
    async fn test_mismatch_falls_back() {
        let generator =
            ScriptedGenerator::new().reply("VISUALIZATION SUGGESTIONS", "Revenue|bar|Q1,Q2|100");
        let keywords = words(&["revenue", "growth", "market", "strategy", "innovation", "customer"]);
        let plots = build_plots(&generator, &keywords, &[]).await;

        assert!(!plots.from_ai);
        assert_eq!(plots.value.len(), 2);
        assert_eq!(plots.value[0].title, "Key Topics Analysis");
        assert_eq!(plots.value[0].values, vec![20, 15, 12, 10, 8]);
        assert_eq!(plots.value[1].title, "Business Focus Areas");
        assert_eq!(plots.value[1].kind, ChartKind::Pie);
        assert_eq!(plots.value[1].labels.len(), 4);
    }

    #[tokio::test]
    async fn test_ai_plots_accepted() {
        let generator = ScriptedGenerator::new()
            .reply("VISUALIZATION SUGGESTIONS", "Growth|line|2022,2023,2024|10,14,19");
        let plots = build_plots(&generator, &[], &[]).await;
        assert!(plots.from_ai);
        assert_eq!(plots.value[0].kind, ChartKind::Line);
    }

    #[test]
    fn test_fallback_truncates_values() {
        let plots = fallback_plots(&words(&["revenue", "growth", "market"]), &[]);
        assert_eq!(plots.len(), 1);
        assert_eq!(plots[0].labels.len(), 3);
        assert_eq!(plots[0].values, vec![20, 15, 12]);
    }

    #[tokio::test]
    async fn test_fallback_from_metrics() {
        let metrics = vec![
            ExtractedMetric::new("Revenue", "$1,200 million", MetricUnit::Currency, MetricCategory::Financial),
            ExtractedMetric::new("Growth", "23.5%", MetricUnit::Percentage, MetricCategory::Performance),
        ];
        let plots = build_plots(&FailingGenerator, &words(&["revenue"]), &metrics).await;
        assert_eq!(plots.value.len(), 1);
        assert_eq!(plots.value[0].title, "Key Metrics Overview");
        assert_eq!(plots.value[0].values, vec![1200, 23]);
        assert!(plots.value.iter().all(PlotDescriptor::is_valid));
    }

    #[test]
    fn test_fallback_with_nothing() {
        assert!(fallback_plots(&[], &[]).is_empty());
    }
}
