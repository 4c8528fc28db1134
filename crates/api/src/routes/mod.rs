//! Route definitions, grouped by resource and mounted under `/api/v1`.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod projects;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/projects", projects::router())
}
