//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inkstone_core::error::CoreError;
use inkstone_core::manuscript::ProjectPatch;
use inkstone_core::model::Project;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub owner_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub owner_id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// GET /api/v1/projects?ownerId=...
///
/// Hydrates the workspace from the durable store and returns the owner's
/// projects, most recently edited first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = state.controller.load_projects(query.owner_id).await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
///
/// The durable write is awaited; on failure nothing changes in memory.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state
        .controller
        .create_project(input.owner_id, &input.title, &input.genre, input.tags)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    let project = state
        .controller
        .get_project(id)
        .await
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// The durable delete is awaited; on failure the project stays listed.
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.controller.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/edits
///
/// Applies one [`ProjectPatch`]: the in-memory commit is synchronous and
/// the response carries the updated project; the durable write happens
/// behind the response (debounced for scene content).
pub async fn apply_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> AppResult<Json<Project>> {
    let project = state.controller.apply_edit(id, patch).await?;
    Ok(Json(project))
}
