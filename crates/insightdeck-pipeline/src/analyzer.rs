//! Analyzer: runs the full extraction pipeline for one document.
//!
//! Pattern extraction always runs first and provides the baseline. AI stages
//! then try to improve individual fields; each one that fails leaves the
//! baseline (or its own deterministic fallback) in place. Every path ends in
//! [`normalize`].

use std::sync::Arc;

use insightdeck_core::analysis::{merge_unique_metrics, MAX_KEYWORDS, MAX_METRICS};
use insightdeck_core::{truncate_chars, AnalysisDraft, AnalysisOptions, AnalysisResult, ExtractedMetric};
use insightdeck_extract::chunking::{chunk_words, should_chunk, TextChunk};
use insightdeck_extract::text::title_case;
use insightdeck_extract::{
    candidate_to_metric, extract, parse_keyword_list, parse_metric_lines, validate_candidates,
    PatternExtraction,
};
use insightdeck_llm::TextGenerator;
use tracing::{debug, error, info};

use crate::error::{StageFailure, StageResult};
use crate::fallback::fallback_result;
use crate::insights::synthesize;
use crate::normalize::normalize;
use crate::plots::{build_plots, fallback_plots};
use crate::prompts;
use crate::stage::OrFallback;

/// Generated summaries must be longer than this to replace the baseline.
const MIN_AI_SUMMARY_CHARS: usize = 150;
const ERROR_SENTINEL: &str = "Error:";
const MIN_CHUNK_SUMMARY_CHARS: usize = 20;
const MIN_CHUNK_KEYWORDS_CHARS: usize = 3;
const MIN_CHUNK_METRICS_CHARS: usize = 10;
const KEYWORDS_PER_CHUNK: usize = 5;
const MAX_CHUNKED_SUMMARY_CHARS: usize = 800;
const DERIVED_FIELD_COUNT: usize = 3;

pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Analyze a document in the mode selected by `options`.
    pub async fn analyze(&self, text: &str, options: &AnalysisOptions) -> AnalysisResult {
        info!(
            "Analyzing {} character document ({} mode, backend {})",
            text.chars().count(),
            options.mode(),
            self.generator.name()
        );
        if options.chunking {
            self.analyze_chunked(text, options).await
        } else {
            self.analyze_full(text, options).await
        }
    }

    async fn analyze_full(&self, text: &str, options: &AnalysisOptions) -> AnalysisResult {
        let generator = self.generator.as_ref();
        let baseline = extract(text);
        let mut draft = baseline_draft(text, &baseline);
        let mut used_ai = false;

        // Summary; an accepted one doubles as the insights.
        let mut summary = baseline.summary.clone();
        let mut insights = None;
        if generator.is_configured() {
            let enhanced = self
                .enhance_summary(text, options.prompt_char_budget)
                .await
                .or_fallback("summary", || baseline.summary.clone());
            if enhanced.from_ai {
                info!("AI summary accepted ({} chars)", enhanced.value.chars().count());
                summary = enhanced.value;
                insights = Some(summary.clone());
                used_ai = true;
            }
        } else {
            debug!("Generation not configured; skipping summary enhancement");
        }

        let ai_metrics = self.ai_metrics(text).await.or_fallback("metrics", Vec::new);
        used_ai |= ai_metrics.from_ai;
        let mut metrics = baseline.metrics.clone();
        merge_unique_metrics(&mut metrics, ai_metrics.value, MAX_METRICS);

        let insights = match insights {
            Some(insights) => insights,
            None => {
                let synthesized = synthesize(generator, &baseline.keywords, &metrics, &summary).await;
                used_ai |= synthesized.from_ai;
                synthesized.value
            }
        };

        let plots = build_plots(generator, &baseline.keywords, &metrics).await;
        used_ai |= plots.from_ai;

        draft.summary = Some(summary);
        draft.insights = Some(insights);
        draft.metrics = Some(metrics);
        draft.plot_data = Some(plots.value);
        draft.processed_with_ai = used_ai;
        normalize(draft)
    }

    async fn enhance_summary(&self, text: &str, budget: usize) -> StageResult<String> {
        let raw = self
            .generator
            .generate(&prompts::summary(text, budget), Some(prompts::SUMMARY_MAX_TOKENS))
            .await?;
        let summary = raw.trim();
        let chars = summary.chars().count();
        if chars <= MIN_AI_SUMMARY_CHARS {
            return Err(StageFailure::TooShort { chars });
        }
        if summary.contains(ERROR_SENTINEL) || !summary.ends_with(['.', '!', '?']) {
            return Err(StageFailure::Incomplete { chars });
        }
        Ok(summary.to_string())
    }

    /// Grounded AI metrics, retrying once with the simpler prompt.
    async fn ai_metrics(&self, text: &str) -> StageResult<Vec<ExtractedMetric>> {
        match self
            .grounded_metrics(&prompts::metrics(text), prompts::METRICS_MAX_TOKENS, text)
            .await
        {
            Ok(metrics) => Ok(metrics),
            Err(StageFailure::Generation(failure)) if !self.generator.is_configured() => {
                Err(failure.into())
            }
            Err(e) => {
                debug!("Structured metric prompt failed ({}); trying simple prompt", e);
                self.grounded_metrics(
                    &prompts::simple_metrics(text),
                    prompts::SIMPLE_METRICS_MAX_TOKENS,
                    text,
                )
                .await
            }
        }
    }

    async fn grounded_metrics(
        &self,
        prompt: &str,
        max_tokens: usize,
        source: &str,
    ) -> StageResult<Vec<ExtractedMetric>> {
        let raw = self.generator.generate(prompt, Some(max_tokens)).await?;
        let candidates = parse_metric_lines(&raw);
        let grounded = validate_candidates(&candidates, source);
        debug!(
            "Metric candidates: {} parsed, {} grounded",
            candidates.len(),
            grounded.len()
        );
        let metrics: Vec<ExtractedMetric> =
            grounded.iter().filter_map(|c| candidate_to_metric(c)).collect();
        if metrics.is_empty() {
            return Err(StageFailure::NoCandidates);
        }
        Ok(metrics)
    }

    async fn analyze_chunked(&self, text: &str, options: &AnalysisOptions) -> AnalysisResult {
        let chunks = if should_chunk(text, options.chunk_threshold) {
            chunk_words(text, options.chunk_size)
        } else {
            vec![TextChunk {
                text: text.to_string(),
                chunk_index: 0,
                total_chunks: 1,
            }]
        };
        info!("Processing document in {} chunk(s)", chunks.len());

        let mut summaries: Vec<String> = Vec::new();
        let mut keywords: Vec<String> = Vec::new();
        let mut metrics: Vec<ExtractedMetric> = Vec::new();
        let mut used_ai = false;

        for chunk in &chunks {
            debug!(
                "Chunk {}/{} ({} chars)",
                chunk.chunk_index + 1,
                chunk.total_chunks,
                chunk.text.chars().count()
            );
            let baseline = extract(&chunk.text);

            let summary = self
                .chunk_summary(&chunk.text)
                .await
                .or_fallback("chunk summary", || baseline.summary.clone());
            used_ai |= summary.from_ai;
            summaries.push(summary.value);

            let chunk_keywords = self
                .chunk_keywords(&chunk.text)
                .await
                .or_fallback("chunk keywords", || baseline.keywords.clone());
            used_ai |= chunk_keywords.from_ai;
            for keyword in chunk_keywords.value.into_iter().take(KEYWORDS_PER_CHUNK) {
                if !keywords.contains(&keyword) {
                    keywords.push(keyword);
                }
            }

            let chunk_metrics = self
                .chunk_metrics(&chunk.text)
                .await
                .or_fallback("chunk metrics", || baseline.metrics.clone());
            used_ai |= chunk_metrics.from_ai;
            merge_unique_metrics(&mut metrics, chunk_metrics.value, MAX_METRICS);
        }

        keywords.truncate(MAX_KEYWORDS);
        let summary = truncate_chars(&summaries.join(" "), MAX_CHUNKED_SUMMARY_CHARS).to_string();
        let plots = fallback_plots(&keywords, &metrics);

        normalize(AnalysisDraft {
            summary: Some(summary),
            insights: Some(format!(
                "Document processed using {} chunks with local AI analysis",
                chunks.len()
            )),
            keywords: Some(keywords),
            metrics: Some(metrics),
            plot_data: Some(plots),
            processed_with_ai: used_ai,
            ..AnalysisDraft::default()
        })
    }

    async fn chunk_summary(&self, chunk: &str) -> StageResult<String> {
        let raw = self.generator.generate(&prompts::chunk_summary(chunk), None).await?;
        let summary = strip_prefix_ci(raw.trim(), "summary:");
        let chars = summary.chars().count();
        if chars <= MIN_CHUNK_SUMMARY_CHARS {
            return Err(StageFailure::TooShort { chars });
        }
        if summary.contains(ERROR_SENTINEL) {
            return Err(StageFailure::Incomplete { chars });
        }
        Ok(summary.to_string())
    }

    async fn chunk_keywords(&self, chunk: &str) -> StageResult<Vec<String>> {
        let raw = self.generator.generate(&prompts::chunk_keywords(chunk), None).await?;
        if raw.trim().chars().count() <= MIN_CHUNK_KEYWORDS_CHARS {
            return Err(StageFailure::TooShort {
                chars: raw.trim().chars().count(),
            });
        }
        let keywords = parse_keyword_list(&raw);
        if keywords.is_empty() {
            return Err(StageFailure::NoCandidates);
        }
        Ok(keywords)
    }

    async fn chunk_metrics(&self, chunk: &str) -> StageResult<Vec<ExtractedMetric>> {
        let raw = self.generator.generate(&prompts::chunk_metrics(chunk), None).await?;
        let body = strip_prefix_ci(raw.trim(), "metrics:");
        if body.chars().count() <= MIN_CHUNK_METRICS_CHARS {
            return Err(StageFailure::TooShort {
                chars: body.chars().count(),
            });
        }
        let grounded = validate_candidates(&parse_metric_lines(body), chunk);
        let metrics: Vec<ExtractedMetric> =
            grounded.iter().filter_map(|c| candidate_to_metric(c)).collect();
        if metrics.is_empty() {
            return Err(StageFailure::NoCandidates);
        }
        Ok(metrics)
    }
}

/// Run an analysis on its own task so that a panic anywhere in the pipeline
/// becomes a fallback result instead of a dropped request.
///
/// `Err` carries the fallback result.
pub async fn analyze_isolated(
    analyzer: Arc<Analyzer>,
    text: String,
    options: AnalysisOptions,
) -> Result<AnalysisResult, AnalysisResult> {
    let input = text.clone();
    let task = tokio::spawn(async move { analyzer.analyze(&input, &options).await });

    match task.await {
        Ok(result) => Ok(result),
        Err(join_error) => {
            let message = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                join_error.to_string()
            };
            error!("Analysis task failed: {}", message);
            Err(fallback_result(
                &text,
                &format!("Document processing failed: {}", message),
            ))
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected panic".to_string()
    }
}

/// Pattern baseline plus the fields derived from its keywords.
fn baseline_draft(text: &str, baseline: &PatternExtraction) -> AnalysisDraft {
    let top: Vec<&String> = baseline.keywords.iter().take(DERIVED_FIELD_COUNT).collect();
    let (advantages, indicators) = if top.is_empty() {
        (
            vec!["Data-Driven Analysis".to_string(), "Strategic Processing".to_string()],
            vec!["Business Analysis".to_string(), "Data Processing".to_string()],
        )
    } else {
        (
            top.iter().map(|k| format!("{} Excellence", title_case(k))).collect(),
            top.iter().map(|k| k.to_string()).collect(),
        )
    };

    AnalysisDraft {
        summary: Some(baseline.summary.clone()),
        keywords: Some(baseline.keywords.clone()),
        metrics: Some(baseline.metrics.clone()),
        insights: Some(baseline.summary.clone()),
        plot_data: None,
        competitive_advantages: Some(advantages),
        market_position: Some(format!(
            "Analysis of {} character business document completed successfully.",
            text.chars().count()
        )),
        success_indicators: Some(indicators),
        processed_with_ai: false,
        fallback: false,
        error: None,
    }
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> &'a str {
    match text.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => text[prefix.len()..].trim(),
        _ => text,
    }
}
