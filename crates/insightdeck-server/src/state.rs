//! Shared application state.

use std::sync::Arc;

use insightdeck_core::AnalysisOptions;
use insightdeck_llm::TextGenerator;
use insightdeck_pipeline::Analyzer;
use parking_lot::RwLock;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    /// Current analysis options; the chunking flag is toggled at runtime.
    pub options: RwLock<AnalysisOptions>,
}

impl AppState {
    pub fn new(options: AnalysisOptions, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            analyzer: Arc::new(Analyzer::new(generator)),
            options: RwLock::new(options),
        }
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        self.analyzer.generator()
    }

    /// Options as of now. Requests take one snapshot and never re-read.
    pub fn options_snapshot(&self) -> AnalysisOptions {
        self.options.read().clone()
    }

    /// Set chunking, or flip it when `enable` is `None`. Returns the options
    /// as written, read under the same lock.
    pub fn set_chunking(&self, enable: Option<bool>) -> AnalysisOptions {
        let mut options = self.options.write();
        options.chunking = enable.unwrap_or(!options.chunking);
        options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightdeck_llm::UnconfiguredGenerator;

    #[test]
    fn test_set_chunking_returns_written_options() {
        let state = AppState::new(AnalysisOptions::default(), Arc::new(UnconfiguredGenerator));

        let flipped = state.set_chunking(None);
        assert!(flipped.chunking);
        assert_eq!(flipped.mode(), "chunked");
        assert_eq!(flipped, state.options_snapshot());

        let set = state.set_chunking(Some(false));
        assert!(!set.chunking);
        assert_eq!(set.mode(), "full_document");
    }
}
