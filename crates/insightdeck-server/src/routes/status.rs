//! Health, chunking toggle and generation canary.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use insightdeck_llm::{run_canary, CanaryReport};
use tracing::info;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/toggle-chunking", post(toggle_chunking))
        .route("/test-generation", get(test_generation))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let options = state.options_snapshot();
    let configured = state.generator().is_configured();
    let chunk_size = if options.chunking {
        serde_json::json!(options.chunk_size)
    } else {
        serde_json::json!("N/A")
    };

    Json(serde_json::json!({
        "status": "healthy",
        "models_loaded": usize::from(configured),
        "generation_configured": configured,
        "processing_mode": options.mode(),
        "chunk_size": chunk_size,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// Chunking toggle
// ---------------------------------------------------------------------------

#[derive(Default, serde::Deserialize)]
struct ToggleInput {
    enable_chunking: Option<bool>,
}

async fn toggle_chunking(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ToggleInput>>,
) -> Json<serde_json::Value> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let options = state.set_chunking(input.enable_chunking);
    let enabled = options.chunking;

    info!("Chunking mode changed to: {}", if enabled { "ENABLED" } else { "DISABLED" });

    Json(serde_json::json!({
        "chunking_enabled": enabled,
        "mode": options.mode(),
        "message": format!("Chunking is now {}", if enabled { "enabled" } else { "disabled" }),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// Generation canary
// ---------------------------------------------------------------------------

async fn test_generation(State(state): State<Arc<AppState>>) -> Json<CanaryReport> {
    let report = run_canary(state.generator().as_ref()).await;
    info!(
        "Generation canary via {}: success={}",
        state.generator().name(),
        report.success
    );
    Json(report)
}
