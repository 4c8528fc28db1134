//! In-memory authoritative project set.
//!
//! The workspace is the copy the author is editing. Edits land here
//! synchronously before any durable write is scheduled, and the durable
//! writers always snapshot the *latest* workspace state — never a stale
//! capture taken when the write was scheduled.

use std::collections::HashMap;

use inkstone_core::error::CoreError;
use inkstone_core::manuscript::{apply_patch, ProjectPatch};
use inkstone_core::model::Project;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared, lock-guarded map of open projects.
pub struct Workspace {
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
        }
    }

    /// Insert projects loaded from the store, keeping any copy already in
    /// memory: a stored row may be staler than in-memory edits whose
    /// debounced write has not fired yet.
    pub async fn hydrate(&self, projects: Vec<Project>) {
        let mut guard = self.projects.write().await;
        for project in projects {
            guard.entry(project.id).or_insert(project);
        }
    }

    pub async fn insert(&self, project: Project) {
        self.projects.write().await.insert(project.id, project);
    }

    pub async fn remove(&self, id: Uuid) -> Option<Project> {
        self.projects.write().await.remove(&id)
    }

    /// Snapshot a project by id.
    pub async fn get(&self, id: Uuid) -> Option<Project> {
        self.projects.read().await.get(&id).cloned()
    }

    /// Snapshot every project owned by a user, most recently edited first.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Vec<Project> {
        let guard = self.projects.read().await;
        let mut projects: Vec<Project> = guard
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.last_edited.cmp(&a.last_edited));
        projects
    }

    /// Apply a patch to a project under the write lock, committing the
    /// result in place and returning a snapshot of it.
    pub async fn apply(&self, id: Uuid, patch: &ProjectPatch) -> Result<Project, CoreError> {
        let mut guard = self.projects.write().await;
        let project = guard.get(&id).ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;
        let updated = apply_patch(project, patch)?;
        guard.insert(id, updated.clone());
        Ok(updated)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use inkstone_core::manuscript::ProjectMetaPatch;

    #[tokio::test]
    async fn apply_commits_in_place() {
        let workspace = Workspace::new();
        let project = Project::new(Uuid::new_v4(), "Before", "G", vec![]);
        let id = project.id;
        workspace.insert(project).await;

        let patch = ProjectPatch::Meta(ProjectMetaPatch {
            title: Some("After".into()),
            ..Default::default()
        });
        let updated = workspace.apply(id, &patch).await.unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(workspace.get(id).await.unwrap().title, "After");
    }

    #[tokio::test]
    async fn apply_to_unknown_project_is_not_found() {
        let workspace = Workspace::new();
        let result = workspace
            .apply(
                Uuid::new_v4(),
                &ProjectPatch::Meta(ProjectMetaPatch::default()),
            )
            .await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "Project", .. }));
    }

    #[tokio::test]
    async fn hydrate_keeps_the_in_memory_copy() {
        let workspace = Workspace::new();
        let mut project = Project::new(Uuid::new_v4(), "In memory", "G", vec![]);
        let id = project.id;
        workspace.insert(project.clone()).await;

        // The stored row is staler than the open copy.
        project.title = "Stale store row".to_string();
        workspace.hydrate(vec![project]).await;

        assert_eq!(workspace.get(id).await.unwrap().title, "In memory");
    }

    #[tokio::test]
    async fn list_by_owner_filters_and_orders() {
        let workspace = Workspace::new();
        let owner = Uuid::new_v4();

        let mut older = Project::new(owner, "Older", "G", vec![]);
        older.last_edited -= chrono::Duration::hours(1);
        let newer = Project::new(owner, "Newer", "G", vec![]);
        let foreign = Project::new(Uuid::new_v4(), "Foreign", "G", vec![]);
        workspace.hydrate(vec![older, newer, foreign]).await;

        let listed = workspace.list_by_owner(owner).await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Newer");
        assert_eq!(listed[1].title, "Older");
    }
}
