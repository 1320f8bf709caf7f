//! Pattern-based extraction: the baseline every analysis starts from.
//!
//! Keywords come from a fixed business lexicon, metrics from a table of
//! regex patterns, and the summary from the document's own sentences padded
//! with analytical filler when the source is sparse. None of this can fail.

pub mod keywords;
pub mod metrics;
pub mod summary;

use insightdeck_core::ExtractedMetric;
use serde::Serialize;

/// Combined pattern extraction result for a document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatternExtraction {
    /// Lexicon terms in first-occurrence order (max 8).
    pub keywords: Vec<String>,
    /// Regex-matched metrics, deduplicated by name (max 8).
    pub metrics: Vec<ExtractedMetric>,
    /// Extractive summary; never empty.
    pub summary: String,
}

/// Run all pattern extractions on a text.
pub fn extract(text: &str) -> PatternExtraction {
    PatternExtraction {
        keywords: keywords::extract_keywords(text),
        metrics: metrics::extract_metrics(text),
        summary: summary::build_summary(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightdeck_core::MetricUnit;

    #[test]
    fn test_extract_scenario() {
        let result = extract("TechCorp revenue grew 23% to $850 million with 94% retention.");

        assert!(result.metrics.iter().any(|m| m.unit == MetricUnit::Percentage
            && (m.name.contains("Growth") || m.name.contains("Retention"))));
        assert!(result
            .metrics
            .iter()
            .any(|m| m.unit == MetricUnit::Currency && m.name.contains("Revenue")));
        assert!(result.keywords.contains(&"revenue".to_string()));
        assert!(result.summary.ends_with('.'));
    }

    #[test]
    fn test_extract_empty_text() {
        let result = extract("");
        assert!(result.keywords.is_empty());
        assert!(result.metrics.is_empty());
        assert!(!result.summary.is_empty());
    }
}
