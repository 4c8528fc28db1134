//! The durable-store seam and the background persistence policy.
//!
//! [`ProjectStore`] is the contract the sync engine requires from a
//! durable store: whole-project save, per-owner load, delete. The
//! production implementation is [`PgProjectStore`] over the `projects`
//! repository; tests substitute an in-memory double.

use std::sync::Arc;

use async_trait::async_trait;
use inkstone_core::model::Project;
use inkstone_db::{DbPool, ProjectRepo, StoreError};
use uuid::Uuid;

use crate::events::{SyncEvent, SyncEventBus};
use crate::workspace::Workspace;

/// Durable persistence contract consumed by the sync engine.
///
/// Implementations must preserve the full nested act/scene/codex
/// structure, including base64 image payloads.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn save_project(&self, project: &Project) -> Result<(), StoreError>;
    async fn load_projects(&self, owner_id: Uuid) -> Result<Vec<Project>, StoreError>;
    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Durable store backed by the PostgreSQL `projects` table.
pub struct PgProjectStore {
    pool: DbPool,
}

impl PgProjectStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        ProjectRepo::upsert(&self.pool, project).await
    }

    async fn load_projects(&self, owner_id: Uuid) -> Result<Vec<Project>, StoreError> {
        ProjectRepo::list_by_owner(&self.pool, owner_id).await
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        ProjectRepo::delete(&self.pool, id).await
    }
}

/// Persist the *latest* workspace snapshot of a project.
///
/// This is the single background-write path used by both the debouncer
/// and immediate metadata saves. Snapshotting at write time (not schedule
/// time) guarantees a fired debounce writes the newest content. On
/// failure the in-memory copy is left untouched as the author's working
/// copy and the failure is published once — never rolled back, never
/// retried.
pub(crate) async fn persist_latest(
    workspace: &Workspace,
    store: &Arc<dyn ProjectStore>,
    events: &SyncEventBus,
    project_id: Uuid,
) {
    // Deleted or never-loaded projects have nothing to write.
    let Some(project) = workspace.get(project_id).await else {
        return;
    };

    match store.save_project(&project).await {
        Ok(()) => {
            tracing::debug!(%project_id, word_count = project.word_count, "Project saved");
            events.publish(SyncEvent::ProjectSaved {
                project_id,
                word_count: project.word_count,
            });
        }
        Err(err) => {
            tracing::warn!(%project_id, error = %err, "Durable save failed; in-memory copy kept");
            events.publish(SyncEvent::SaveFailed {
                project_id,
                reason: err.to_string(),
            });
        }
    }
}
