//! Handlers for scene-scoped operations: AI drafting and debounce flushes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inkstone_core::model::Project;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    /// What should happen next in the scene.
    pub instruction: String,
}

/// POST /api/v1/projects/{project_id}/scenes/{scene_id}/draft
///
/// Generates prose from the instruction (with the scene tail as context)
/// and appends it to the scene content.
pub async fn draft(
    State(state): State<AppState>,
    Path((project_id, scene_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<DraftRequest>,
) -> AppResult<Json<Project>> {
    let project = state
        .controller
        .generate_draft(project_id, scene_id, &input.instruction)
        .await?;
    Ok(Json(project))
}

/// POST /api/v1/projects/{project_id}/scenes/{scene_id}/flush
///
/// Runs the scene's pending debounced write immediately. The UI calls
/// this when the author navigates away from the editor so pending content
/// never rides on a timer that may not fire.
pub async fn flush(
    State(state): State<AppState>,
    Path((_project_id, scene_id)): Path<(Uuid, Uuid)>,
) -> StatusCode {
    state.controller.flush_scene(scene_id).await;
    StatusCode::NO_CONTENT
}
