//! Route definitions for the `/projects` resource.
//!
//! Also nests scene- and codex-scoped routes under
//! `/projects/{project_id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{codex, projects, scenes};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                      -> list (hydrates workspace)
/// POST   /                                      -> create (awaited write)
/// GET    /{id}                                  -> get_by_id
/// DELETE /{id}                                  -> delete (awaited write)
/// POST   /{id}/edits                            -> apply_edit
///
/// POST   /{project_id}/scenes/{scene_id}/draft  -> AI draft append
/// POST   /{project_id}/scenes/{scene_id}/flush  -> flush pending write
///
/// POST   /{project_id}/codex/scan               -> AI codex scan
/// POST   /{project_id}/codex/import             -> manual import
/// ```
pub fn router() -> Router<AppState> {
    let scene_routes = Router::new()
        .route("/{scene_id}/draft", post(scenes::draft))
        .route("/{scene_id}/flush", post(scenes::flush));

    let codex_routes = Router::new()
        .route("/scan", post(codex::scan))
        .route("/import", post(codex::import));

    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get_by_id).delete(projects::delete))
        .route("/{id}/edits", post(projects::apply_edit))
        .nest("/{project_id}/scenes", scene_routes)
        .nest("/{project_id}/codex", codex_routes)
}
