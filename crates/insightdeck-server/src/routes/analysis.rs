//! Document analysis endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use insightdeck_core::AnalysisResult;
use insightdeck_pipeline::{analyze_isolated, fallback_result};
use tracing::{error, info, warn, Instrument};

use crate::state::AppState;

pub const NO_TEXT_ERROR: &str = "No text provided";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/process-sensitive-document", post(process_document))
}

#[derive(serde::Deserialize)]
struct DocumentInput {
    #[serde(default)]
    text: Option<String>,
}

async fn process_document(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DocumentInput>, JsonRejection>,
) -> (StatusCode, Json<AnalysisResult>) {
    let request_id = uuid::Uuid::new_v4();

    let text = match body {
        Ok(Json(input)) => input.text.unwrap_or_default(),
        Err(rejection) => {
            warn!(%request_id, "Unreadable request body: {}", rejection);
            String::new()
        }
    };

    if text.trim().is_empty() {
        warn!(%request_id, "No text provided in request");
        return (
            StatusCode::BAD_REQUEST,
            Json(fallback_result("", NO_TEXT_ERROR)),
        );
    }

    let options = state.options_snapshot();
    let span = tracing::info_span!("analysis", %request_id, mode = options.mode());

    async move {
        info!("Processing document ({} characters)", text.chars().count());
        match analyze_isolated(state.analyzer.clone(), text, options).await {
            Ok(result) => {
                info!(
                    "Returning {} keywords, {} metrics, {} plots",
                    result.keywords.len(),
                    result.metrics.len(),
                    result.plot_data.len()
                );
                (StatusCode::OK, Json(result))
            }
            Err(fallback) => {
                error!("Returning catastrophic fallback result");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback))
            }
        }
    }
    .instrument(span)
    .await
}
