//! Handlers for codex extraction and import.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inkstone_core::model::Project;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Raw pasted character notes: name on the first line, then
    /// `Key: Value` lines.
    pub text: String,
}

/// POST /api/v1/projects/{project_id}/codex/scan
///
/// Runs the AI character extraction over the manuscript and merges the
/// result into the codex, honoring entry locks.
pub async fn scan(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    let project = state.controller.run_codex_scan(project_id).await?;
    Ok(Json(project))
}

/// POST /api/v1/projects/{project_id}/codex/import
///
/// Imports pasted notes as a new, locked codex entry.
pub async fn import(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(input): Json<ImportRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state
        .controller
        .import_manual_entry(project_id, &input.text)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}
