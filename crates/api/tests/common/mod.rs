//! Shared helpers for API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use inkstone_api::state::AppState;
use inkstone_sync::{PgProjectStore, ProjectStore, SyncController};
use inkstone_textgen::{ProviderConfig, TextGenClient};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build the application router over a test database pool.
///
/// The text generation client points at a local Ollama endpoint that
/// these tests never actually call — AI flows are covered by the sync
/// crate against scripted doubles.
pub fn build_test_app(pool: PgPool) -> Router {
    let store: Arc<dyn ProjectStore> = Arc::new(PgProjectStore::new(pool.clone()));
    let textgen = Arc::new(TextGenClient::new(ProviderConfig::ollama()));
    let controller = Arc::new(SyncController::new(store, textgen));
    inkstone_api::app(AppState { pool, controller })
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
