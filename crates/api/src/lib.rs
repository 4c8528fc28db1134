//! Inkstone HTTP API.
//!
//! Thin axum surface over the sync engine: project lifecycle, edits,
//! debounce flushes, the AI codex scan, manual imports, and scene
//! drafting. The binary in `main.rs` adds configuration, tracing, the
//! middleware stack, and graceful shutdown on top of [`app`].

use axum::Router;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use state::AppState;

/// The full route tree with state applied, shared by the binary and the
/// integration tests. Middleware layers are the binary's concern.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        // API v1 routes.
        .nest("/api/v1", routes::api_routes())
        .with_state(state)
}
