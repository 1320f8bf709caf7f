//! Regex metric extraction driven by a pattern table.
//!
//! Each metric kind owns an ordered list of patterns. The first pattern of a
//! kind that matches anything contributes up to [`MATCHES_PER_KIND`] metrics
//! and the remaining patterns of that kind are skipped. Kinds are grouped
//! into families that fix the unit, category and name prefix.

use insightdeck_core::analysis::{merge_unique_metrics, MAX_METRICS, MAX_METRIC_NAME_CHARS};
use insightdeck_core::{truncate_chars, ExtractedMetric, MetricCategory, MetricUnit};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{title_case, NUMBER_PATTERN};

/// Matches kept from the winning pattern of a kind.
pub const MATCHES_PER_KIND: usize = 2;

/// `$850 million`, `€1,200.5M`, `£3B`
const CURRENCY_VALUE: &str = r"[€$£¥]\s?{N}(?:\s*(?:million|billion|thousand|M|B|K)\b)?";
/// `23%`, `94.5%`
const PERCENT_VALUE: &str = r"\d+(?:\.\d+)?%";
/// `1,200`
const COUNT_VALUE: &str = "{N}";

/// Label words of each currency kind. A loose pattern's `gap` group must not
/// contain the labels of another kind.
const CURRENCY_LABELS: &[(&str, &[&str])] = &[
    ("revenue", &["revenue", "sales"]),
    ("profit", &["profit", "income", "earnings"]),
    ("valuation", &["valuation", "market value", "investment", "funding"]),
    ("cost_savings", &["cost", "expense", "saving"]),
];

/// Family of a metric kind; decides unit, category and name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFamily {
    Currency,
    Percentage,
    Count,
    Margin,
}

impl MetricFamily {
    pub fn unit(self) -> MetricUnit {
        match self {
            Self::Currency => MetricUnit::Currency,
            Self::Percentage | Self::Margin => MetricUnit::Percentage,
            Self::Count => MetricUnit::Count,
        }
    }

    pub fn category(self) -> MetricCategory {
        match self {
            Self::Currency | Self::Margin => MetricCategory::Financial,
            Self::Percentage => MetricCategory::Performance,
            Self::Count => MetricCategory::Operational,
        }
    }

    fn name_prefix(self) -> &'static str {
        match self {
            Self::Count => "Total ",
            _ => "",
        }
    }
}

/// One compiled pattern. Must define a `value` group, and either a `label`
/// group or a fixed label.
struct MetricPattern {
    regex: Regex,
    fixed_label: Option<&'static str>,
}

/// A metric kind and its ordered patterns.
pub struct MetricKind {
    pub id: &'static str,
    pub family: MetricFamily,
    patterns: Vec<MetricPattern>,
}

impl MetricKind {
    fn new(id: &'static str, family: MetricFamily, specs: &[(&str, Option<&'static str>)]) -> Self {
        let patterns = specs
            .iter()
            .map(|(pattern, fixed_label)| {
                let expanded = pattern
                    .replace("{CUR}", CURRENCY_VALUE)
                    .replace("{PCT}", PERCENT_VALUE)
                    .replace("{NUM}", COUNT_VALUE)
                    .replace("{N}", NUMBER_PATTERN);
                MetricPattern {
                    regex: Regex::new(&expanded).expect("metric pattern compiles"),
                    fixed_label: *fixed_label,
                }
            })
            .collect();
        Self {
            id,
            family,
            patterns,
        }
    }

    /// Metrics from the first pattern of this kind that matches.
    fn extract(&self, text: &str) -> Vec<ExtractedMetric> {
        for pattern in &self.patterns {
            let hits: Vec<ExtractedMetric> = pattern
                .regex
                .captures_iter(text)
                .filter_map(|caps| {
                    if let Some(gap) = caps.name("gap") {
                        if crosses_other_label(self.id, gap.as_str()) {
                            return None;
                        }
                    }
                    let value = caps.name("value")?.as_str().trim();
                    if self.family == MetricFamily::Count && looks_like_year(value) {
                        return None;
                    }
                    let label = match pattern.fixed_label {
                        Some(fixed) => fixed.to_string(),
                        None => title_case(caps.name("label")?.as_str().trim()),
                    };
                    let name = format!("{}{}", self.family.name_prefix(), label);
                    Some(ExtractedMetric::new(
                        truncate_chars(&name, MAX_METRIC_NAME_CHARS),
                        value,
                        self.family.unit(),
                        self.family.category(),
                    ))
                })
                .take(MATCHES_PER_KIND)
                .collect();
            if !hits.is_empty() {
                return hits;
            }
        }
        Vec::new()
    }
}

fn crosses_other_label(kind_id: &str, gap: &str) -> bool {
    let gap = gap.to_lowercase();
    CURRENCY_LABELS
        .iter()
        .filter(|(id, _)| *id != kind_id)
        .flat_map(|(_, labels)| labels.iter())
        .any(|label| gap.contains(label))
}

/// `2023` next to "customers" is a date, not a count.
fn looks_like_year(value: &str) -> bool {
    value.len() == 4
        && value
            .parse::<u16>()
            .is_ok_and(|year| (1900..=2099).contains(&year))
}

static METRIC_KINDS: Lazy<Vec<MetricKind>> = Lazy::new(|| {
    use MetricFamily::*;
    vec![
        // Currency
        MetricKind::new("revenue", Currency, &[
            (r"(?i)\b(?P<label>annual revenue|total revenue|net revenue|revenue|sales)\s*[:\-]?\s*(?P<value>{CUR})", None),
            (r"(?i)\b(?P<label>annual revenue|total revenue|net revenue|revenue|sales)\b(?P<gap>[^.\n€$£¥]{0,40}?)(?P<value>{CUR})", None),
            (r"(?i)(?P<value>{CUR})\s+(?:in\s+)?(?P<label>annual revenue|total revenue|revenue|sales)\b", None),
        ]),
        MetricKind::new("profit", Currency, &[
            (r"(?i)\b(?P<label>net profit|net income|profit|earnings|income)\s*[:\-]?\s*(?P<value>{CUR})", None),
            (r"(?i)\b(?P<label>net profit|net income|profit|earnings)\b(?P<gap>[^.\n€$£¥]{0,40}?)(?P<value>{CUR})", None),
        ]),
        MetricKind::new("valuation", Currency, &[
            (r"(?i)\b(?P<label>market value|valuation|investment|funding)\s*[:\-]?\s*(?P<value>{CUR})", None),
            (r"(?i)\b(?P<label>market value|valuation|funding)\b(?P<gap>[^.\n€$£¥]{0,40}?)(?P<value>{CUR})", None),
        ]),
        MetricKind::new("cost_savings", Currency, &[
            (r"(?i)\b(?P<label>cost savings|expenses|costs)\s*[:\-]?\s*(?P<value>{CUR})", None),
            (r"(?i)\b(?P<label>cost savings)\b(?P<gap>[^.\n€$£¥]{0,40}?)(?P<value>{CUR})", None),
        ]),
        // Percentage
        MetricKind::new("growth", Percentage, &[
            (r"(?i)\b(?P<label>growth|increase|improvement|rise)\s*[:\-]?\s*(?:of\s+)?(?P<value>{PCT})", None),
            (r"(?i)\b(?:grew|grown|rose|increased|climbed|up)\s+(?:by\s+)?(?P<value>{PCT})", Some("Growth")),
            (r"(?i)(?P<value>{PCT})\s+(?P<label>growth|increase|improvement|rise)\b", None),
        ]),
        MetricKind::new("market_share", Percentage, &[
            (r"(?i)\b(?P<label>market share|share)\s*[:\-]?\s*(?:of\s+)?(?P<value>{PCT})", None),
            (r"(?i)(?P<value>{PCT})\s+(?:of\s+the\s+)?(?P<label>market share)\b", None),
        ]),
        MetricKind::new("retention", Percentage, &[
            (r"(?i)\b(?P<label>retention rate|retention|satisfaction)\s*[:\-]?\s*(?:of\s+)?(?P<value>{PCT})", None),
            (r"(?i)(?P<value>{PCT})\s+(?:customer\s+)?(?P<label>retention rate|retention|satisfaction)\b", None),
        ]),
        MetricKind::new("efficiency", Percentage, &[
            (r"(?i)\b(?P<label>efficiency|productivity|performance)\s*[:\-]?\s*(?:of\s+)?(?P<value>{PCT})", None),
            (r"(?i)(?P<value>{PCT})\s+(?P<label>efficiency|productivity)\b", None),
        ]),
        // Count
        MetricKind::new("customers", Count, &[
            (r"(?i)\b(?P<value>{NUM})\s+(?:new\s+)?(?P<label>customers|clients|users)\b", None),
        ]),
        MetricKind::new("employees", Count, &[
            (r"(?i)\b(?P<value>{NUM})\s+(?P<label>employees|staff|workforce)\b", None),
        ]),
        MetricKind::new("locations", Count, &[
            (r"(?i)\b(?P<value>{NUM})\s+(?P<label>locations|offices|stores)\b", None),
        ]),
        // Margin
        MetricKind::new("margin", Margin, &[
            (r"(?i)\b(?P<label>profit margin|operating margin|net margin|gross margin)\s*[:\-]?\s*(?:of|was|is|at|reached|increased to|improved to)?\s*(?P<value>{PCT})", None),
            (r"(?i)\b(?P<label>profit margin|operating margin|net margin|gross margin)\b[^.\n%]{0,30}?(?P<value>{PCT})", None),
        ]),
    ]
});

/// The compiled pattern table, in evaluation order.
pub fn metric_kinds() -> &'static [MetricKind] {
    &METRIC_KINDS
}

/// Extract metrics from text: per kind first-match-wins, deduplicated by
/// normalized name, capped at [`MAX_METRICS`].
pub fn extract_metrics(text: &str) -> Vec<ExtractedMetric> {
    let found = METRIC_KINDS.iter().flat_map(|kind| kind.extract(text));
    let mut metrics = Vec::new();
    merge_unique_metrics(&mut metrics, found, MAX_METRICS);
    metrics
}
