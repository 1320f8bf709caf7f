//! HTTP route handlers.

pub mod analysis;
pub mod status;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(analysis::routes())
        .merge(status::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
