//! Analysis result types: the contract returned to callers.

use serde::{Deserialize, Serialize};

/// Maximum metric name length.
pub const MAX_METRIC_NAME_CHARS: usize = 50;
/// Maximum keywords in a result.
pub const MAX_KEYWORDS: usize = 10;
/// Maximum metrics in a result.
pub const MAX_METRICS: usize = 8;
/// Maximum plots in a result.
pub const MAX_PLOTS: usize = 2;
/// Plot title length bounds (characters).
pub const PLOT_TITLE_CHARS: std::ops::RangeInclusive<usize> = 1..=50;
/// Plot label count bounds.
pub const PLOT_LABELS: std::ops::RangeInclusive<usize> = 2..=6;

/// Unit attached to a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MetricUnit {
    Currency,
    Percentage,
    Count,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl std::fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Currency => write!(f, "Currency"),
            Self::Percentage => write!(f, "Percentage"),
            Self::Count => write!(f, "Count"),
            Self::Unspecified => Ok(()),
        }
    }
}

/// Business area a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MetricCategory {
    Financial,
    Market,
    Customer,
    Operational,
    Innovation,
    Performance,
    #[default]
    General,
}

impl std::fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Financial => "Financial",
            Self::Market => "Market",
            Self::Customer => "Customer",
            Self::Operational => "Operational",
            Self::Innovation => "Innovation",
            Self::Performance => "Performance",
            Self::General => "General",
        };
        write!(f, "{}", s)
    }
}

/// A quantified claim pulled out of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetric {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub unit: MetricUnit,
    #[serde(default)]
    pub category: MetricCategory,
}

impl ExtractedMetric {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        unit: MetricUnit,
        category: MetricCategory,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit,
            category,
        }
    }

    /// Key used for duplicate suppression.
    pub fn normalized_name(&self) -> String {
        normalize_metric_name(&self.name)
    }
}

/// Case- and whitespace-insensitive metric name key.
pub fn normalize_metric_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Append metrics to `target`, skipping names already present. First occurrence wins.
pub fn merge_unique_metrics(
    target: &mut Vec<ExtractedMetric>,
    incoming: impl IntoIterator<Item = ExtractedMetric>,
    cap: usize,
) {
    let mut seen: std::collections::HashSet<String> =
        target.iter().map(|m| m.normalized_name()).collect();
    for metric in incoming {
        if target.len() >= cap {
            break;
        }
        if seen.insert(metric.normalized_name()) {
            target.push(metric);
        }
    }
}

/// Chart kind for a plot descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    /// Map free text onto a chart kind, defaulting to bar.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "line" => Self::Line,
            "pie" => Self::Pie,
            _ => Self::Bar,
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bar => write!(f, "bar"),
            Self::Line => write!(f, "line"),
            Self::Pie => write!(f, "pie"),
        }
    }
}

/// Chart-ready data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotDescriptor {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl PlotDescriptor {
    /// Title bounds, label count bounds, and label/value parity.
    pub fn is_valid(&self) -> bool {
        PLOT_TITLE_CHARS.contains(&self.title.chars().count())
            && PLOT_LABELS.contains(&self.labels.len())
            && self.labels.len() == self.values.len()
    }
}

/// The response contract for one analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub keywords: Vec<String>,
    pub metrics: Vec<ExtractedMetric>,
    pub insights: String,
    pub plot_data: Vec<PlotDescriptor>,
    pub competitive_advantages: Vec<String>,
    pub market_position: String,
    pub success_indicators: Vec<String>,
    pub processed_locally: bool,
    #[serde(rename = "processedWithAI")]
    pub processed_with_ai: bool,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Partially-populated analysis, assembled by pipeline stages and fed to the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisDraft {
    pub summary: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub metrics: Option<Vec<ExtractedMetric>>,
    pub insights: Option<String>,
    pub plot_data: Option<Vec<PlotDescriptor>>,
    pub competitive_advantages: Option<Vec<String>>,
    pub market_position: Option<String>,
    pub success_indicators: Option<Vec<String>>,
    pub processed_with_ai: bool,
    pub fallback: bool,
    pub error: Option<String>,
}

impl From<AnalysisResult> for AnalysisDraft {
    fn from(result: AnalysisResult) -> Self {
        Self {
            summary: Some(result.summary),
            keywords: Some(result.keywords),
            metrics: Some(result.metrics),
            insights: Some(result.insights),
            plot_data: Some(result.plot_data),
            competitive_advantages: Some(result.competitive_advantages),
            market_position: Some(result.market_position),
            success_indicators: Some(result.success_indicators),
            processed_with_ai: result.processed_with_ai,
            fallback: result.fallback.unwrap_or(false),
            error: result.error,
        }
    }
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
