//! InsightDeck Core — analysis result types, configuration, errors.

pub mod analysis;
pub mod config;
pub mod error;

pub use analysis::{
    truncate_chars, AnalysisDraft, AnalysisResult, ChartKind, ExtractedMetric, MetricCategory,
    MetricUnit, PlotDescriptor,
};
pub use config::{AnalysisOptions, InsightConfig};
pub use error::{Error, Result};
