//! Router-level tests: response shapes and status codes as seen by clients.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use insightdeck_core::InsightConfig;
use insightdeck_llm::{GenerationOutcome, TextGenerator, UnconfiguredGenerator};
use insightdeck_server::routes::build_router;
use insightdeck_server::state::AppState;
use tower::ServiceExt;

const REPORT: &str = "Northwind Traders reported revenue of $850 million for fiscal 2024. \
    Revenue growth reached 23% year over year as the company expanded into new markets. \
    Customer retention improved to 94% while the team grew to 1,200 employees. \
    Strategic investment in innovation and digital transformation continues to drive market share gains.";

struct PanickingGenerator;

#[async_trait]
impl TextGenerator for PanickingGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: Option<usize>) -> GenerationOutcome {
        panic!("backend exploded");
    }
    fn is_configured(&self) -> bool {
        true
    }
    fn name(&self) -> &'static str {
        "panicking"
    }
}

fn app_with(generator: Arc<dyn TextGenerator>) -> Router {
    let config = InsightConfig::from_lookup(|_| None).unwrap();
    build_router(Arc::new(AppState::new(config.analysis, generator)))
}

fn app() -> Router {
    app_with(Arc::new(UnconfiguredGenerator))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn assert_result_shape(json: &serde_json::Value) {
    assert!(json["summary"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(json["insights"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(json["marketPosition"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(json["keywords"].is_array());
    assert!(json["metrics"].is_array());
    assert!(json["plotData"].is_array());
    assert!(json["competitiveAdvantages"].as_array().is_some_and(|a| !a.is_empty()));
    assert!(json["successIndicators"].as_array().is_some_and(|a| !a.is_empty()));
    assert_eq!(json["processedLocally"], true);
    assert!(json["processedWithAI"].is_boolean());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_shape() {
    let (status, json) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["models_loaded"], 0);
    assert_eq!(json["generation_configured"], false);
    assert_eq!(json["processing_mode"], "full_document");
    assert_eq!(json["chunk_size"], "N/A");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_toggle_changes_next_request() {
    let app = app();

    let (status, json) = send(&app, Method::POST, "/toggle-chunking", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["chunking_enabled"], true);
    assert_eq!(json["mode"], "chunked");
    assert_eq!(json["message"], "Chunking is now enabled");

    let (_, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health["processing_mode"], "chunked");
    assert_eq!(health["chunk_size"], 10_000);

    let body = serde_json::json!({ "text": REPORT });
    let (status, json) = send(&app, Method::POST, "/process-sensitive-document", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["insights"], "Document processed using 1 chunks with local AI analysis");
    assert_result_shape(&json);

    let (_, json) = send(
        &app,
        Method::POST,
        "/toggle-chunking",
        Some(serde_json::json!({ "enable_chunking": false })),
    )
    .await;
    assert_eq!(json["chunking_enabled"], false);
    assert_eq!(json["mode"], "full_document");
}

#[tokio::test]
async fn test_explicit_toggle_is_idempotent() {
    let app = app();
    let body = serde_json::json!({ "enable_chunking": true });
    send(&app, Method::POST, "/toggle-chunking", Some(body.clone())).await;
    let (_, json) = send(&app, Method::POST, "/toggle-chunking", Some(body)).await;
    assert_eq!(json["chunking_enabled"], true);
}

#[tokio::test]
async fn test_missing_text_is_bad_request() {
    let app = app();
    for body in [
        serde_json::json!({ "text": "" }),
        serde_json::json!({ "text": "   " }),
        serde_json::json!({ "other": 1 }),
    ] {
        let (status, json) = send(&app, Method::POST, "/process-sensitive-document", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["fallback"], true);
        assert_eq!(json["error"], "No text provided");
        assert_result_shape(&json);
    }
}

#[tokio::test]
async fn test_unreadable_body_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/process-sensitive-document")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "No text provided");
}

#[tokio::test]
async fn test_full_document_without_generation() {
    let body = serde_json::json!({ "text": REPORT });
    let (status, json) = send(&app(), Method::POST, "/process-sensitive-document", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_result_shape(&json);
    assert_eq!(json["processedWithAI"], false);
    assert!(json.get("fallback").is_none());

    let metrics = json["metrics"].as_array().unwrap();
    assert!(!metrics.is_empty() && metrics.len() <= 8);
    assert!(metrics.iter().all(|m| m["name"].is_string() && m["value"].is_string()));
    assert!(json["keywords"].as_array().unwrap().len() <= 10);
    assert!(json["plotData"].as_array().unwrap().len() <= 2);
    assert!(json["insights"]
        .as_str()
        .unwrap()
        .ends_with("[AI-powered analysis with local processing]"));
}

#[tokio::test]
async fn test_pipeline_panic_is_server_error() {
    let app = app_with(Arc::new(PanickingGenerator));
    let body = serde_json::json!({ "text": REPORT });
    let (status, json) = send(&app, Method::POST, "/process-sensitive-document", Some(body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_result_shape(&json);
    assert_eq!(json["fallback"], true);
    assert_eq!(json["processedWithAI"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Document processing failed: backend exploded"));
    assert!(json["summary"].as_str().unwrap().starts_with("Northwind Traders reported revenue"));
}

#[tokio::test]
async fn test_generation_canary_unconfigured() {
    let (status, json) = send(&app(), Method::GET, "/test-generation", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert!(json["result"].as_str().unwrap().starts_with("Error:"));
    assert!(json["test_prompt"].is_string());
    assert!(json["result_length"].is_number());
}
