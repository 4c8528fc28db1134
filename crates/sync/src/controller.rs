//! Orchestration of edits, persistence, and AI-assisted codex flows.
//!
//! [`SyncController`] is the surface the HTTP layer calls. Every edit
//! commits to the in-memory [`Workspace`] synchronously and
//! optimistically; what differs per edit is only how the durable write is
//! scheduled afterwards:
//!
//! - scene **content** edits re-arm the per-scene debounce timer;
//! - every other edit (titles, synopses, status, codex, covers) writes
//!   immediately in a background task — low-frequency edits deserve
//!   immediate save confirmation, independent of any in-flight content
//!   timer;
//! - project **creation and deletion** are the exception to optimism: the
//!   durable write is awaited, and memory changes only on success.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inkstone_core::error::CoreError;
use inkstone_core::manuscript::{ProjectPatch, ScenePatch};
use inkstone_core::model::Project;
use inkstone_core::{codex, extraction, prompts};
use inkstone_db::StoreError;
use inkstone_textgen::{TextGenClient, TextGenError};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::debounce::{SaveDebouncer, CONTENT_SAVE_DEBOUNCE};
use crate::events::{SyncEvent, SyncEventBus};
use crate::persist::{persist_latest, ProjectStore};
use crate::workspace::Workspace;

// ---------------------------------------------------------------------------
// Collaborator seam
// ---------------------------------------------------------------------------

/// The generative text collaborator as seen by the sync engine:
/// `generate(prompt, system_instruction) -> text`. Timeouts and transport
/// concerns live behind this seam and surface only as [`TextGenError`].
#[async_trait]
pub trait TextService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, TextGenError>;
}

#[async_trait]
impl TextService for TextGenClient {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, TextGenError> {
        TextGenClient::generate(self, prompt, system_instruction).await
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the sync controller.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A domain-level error (unknown entity, invalid input, unparseable
    /// extraction batch).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An *awaited* durable write failed (create/delete/load). Background
    /// write failures never surface here — they are published as
    /// [`SyncEvent::SaveFailed`] instead.
    #[error("Persistence failed: {0}")]
    Store(#[from] StoreError),

    /// The generative text service failed or answered empty.
    #[error("Generation failed: {0}")]
    Service(#[from] TextGenError),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Orchestrates edits → aggregate recompute → persistence scheduling, and
/// the AI-assisted codex/drafting flows.
pub struct SyncController {
    workspace: Arc<Workspace>,
    store: Arc<dyn ProjectStore>,
    textgen: Arc<dyn TextService>,
    events: SyncEventBus,
    debouncer: SaveDebouncer,
}

impl SyncController {
    /// Controller with the standard 500 ms content debounce.
    pub fn new(store: Arc<dyn ProjectStore>, textgen: Arc<dyn TextService>) -> Self {
        Self::with_debounce(store, textgen, CONTENT_SAVE_DEBOUNCE)
    }

    /// Controller with a custom content-debounce quiet period.
    pub fn with_debounce(
        store: Arc<dyn ProjectStore>,
        textgen: Arc<dyn TextService>,
        debounce: Duration,
    ) -> Self {
        let workspace = Arc::new(Workspace::new());
        let events = SyncEventBus::default();
        let debouncer = SaveDebouncer::new(
            debounce,
            Arc::clone(&workspace),
            Arc::clone(&store),
            events.clone(),
        );
        Self {
            workspace,
            store,
            textgen,
            events,
            debouncer,
        }
    }

    /// Subscribe to sync outcomes (saves, failures, scans).
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    // -- project lifecycle --------------------------------------------------

    /// Load a user's projects from the durable store into the workspace.
    ///
    /// Projects already open in memory are kept as-is — their in-memory
    /// state may be ahead of the store — so the returned list reflects
    /// the workspace, not the raw store rows.
    pub async fn load_projects(&self, owner_id: Uuid) -> Result<Vec<Project>, SyncError> {
        let projects = self.store.load_projects(owner_id).await?;
        self.workspace.hydrate(projects).await;
        Ok(self.workspace.list_by_owner(owner_id).await)
    }

    /// Snapshot a single open project.
    pub async fn get_project(&self, id: Uuid) -> Option<Project> {
        self.workspace.get(id).await
    }

    /// Create a project. NOT optimistic: the durable write is awaited and
    /// the workspace only learns about the project on success.
    pub async fn create_project(
        &self,
        owner_id: Uuid,
        title: &str,
        genre: &str,
        tags: Vec<String>,
    ) -> Result<Project, SyncError> {
        let project = Project::new(owner_id, title, genre, tags);
        self.store.save_project(&project).await?;
        self.workspace.insert(project.clone()).await;
        tracing::info!(project_id = %project.id, title = %project.title, "Project created");
        Ok(project)
    }

    /// Delete a project. NOT optimistic: on store failure the workspace
    /// is left untouched and the error is surfaced.
    pub async fn delete_project(&self, id: Uuid) -> Result<(), SyncError> {
        let removed = self.store.delete_project(id).await?;
        if !removed {
            return Err(CoreError::NotFound {
                entity: "Project",
                id,
            }
            .into());
        }
        self.workspace.remove(id).await;
        self.events
            .publish(SyncEvent::ProjectDeleted { project_id: id });
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    // -- edits ---------------------------------------------------------------

    /// Apply an edit: commit to memory synchronously, then schedule the
    /// durable write (debounced for scene content, immediate otherwise).
    pub async fn apply_edit(
        &self,
        project_id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, SyncError> {
        let updated = self.workspace.apply(project_id, &patch).await?;

        match patch.scene_id() {
            Some(scene_id) if patch.is_content_edit() => {
                self.debouncer.schedule(project_id, scene_id).await;
            }
            _ => self.spawn_immediate_save(project_id),
        }

        Ok(updated)
    }

    /// Flush a scene's pending debounced write (scene-switch path).
    pub async fn flush_scene(&self, scene_id: Uuid) {
        self.debouncer.flush_scene(scene_id).await;
    }

    /// Flush every pending debounced write (shutdown path).
    pub async fn flush_all(&self) {
        self.debouncer.flush_all().await;
    }

    fn spawn_immediate_save(&self, project_id: Uuid) {
        let workspace = Arc::clone(&self.workspace);
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        tokio::spawn(async move {
            persist_latest(&workspace, &store, &events, project_id).await;
        });
    }

    // -- AI flows ------------------------------------------------------------

    /// Scan the manuscript for characters and merge them into the codex.
    ///
    /// All-or-nothing at the JSON-parse level (an unparseable response
    /// discards the batch and leaves the codex untouched), per-candidate
    /// at the merge level (a nameless candidate is dropped without
    /// affecting its siblings, a locked match is skipped).
    pub async fn run_codex_scan(&self, project_id: Uuid) -> Result<Project, SyncError> {
        let project = self
            .workspace
            .get(project_id)
            .await
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;

        let excerpt = prompts::manuscript_excerpt(&project, prompts::MAX_SCAN_EXCERPT_CHARS);
        if excerpt.is_empty() {
            return Err(CoreError::Validation(
                "Manuscript has no content to scan".to_string(),
            )
            .into());
        }

        let response = self
            .textgen
            .generate(
                &prompts::extraction_prompt(&excerpt),
                prompts::EXTRACTION_SYSTEM_INSTRUCTION,
            )
            .await?;

        let candidates = extraction::parse_ai_extraction(&response)?;
        let outcome = codex::merge_candidates(&candidates, &project.codex);
        tracing::info!(
            %project_id,
            created = outcome.created,
            updated = outcome.updated,
            skipped_locked = outcome.skipped_locked,
            "Codex scan merged",
        );

        let updated = self
            .apply_edit(
                project_id,
                ProjectPatch::ReplaceCodex {
                    codex: outcome.codex,
                },
            )
            .await?;

        self.events.publish(SyncEvent::ScanCompleted {
            project_id,
            created: outcome.created,
            updated: outcome.updated,
            skipped_locked: outcome.skipped_locked,
        });
        Ok(updated)
    }

    /// Import manually pasted character notes as a new locked entry.
    pub async fn import_manual_entry(
        &self,
        project_id: Uuid,
        raw: &str,
    ) -> Result<Project, SyncError> {
        let candidate = extraction::parse_manual_import(raw).ok_or_else(|| {
            CoreError::Validation("Import text must contain at least a name line".to_string())
        })?;
        let entry = codex::manual_entry(&candidate);
        self.apply_edit(project_id, ProjectPatch::UpsertCodexEntry { entry })
            .await
    }

    /// Generate prose from an instruction and append it to a scene.
    ///
    /// The appended content goes through the normal content-edit path, so
    /// it lands in memory instantly and reaches the store via the
    /// debounced write.
    pub async fn generate_draft(
        &self,
        project_id: Uuid,
        scene_id: Uuid,
        instruction: &str,
    ) -> Result<Project, SyncError> {
        let project = self
            .workspace
            .get(project_id)
            .await
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;
        let scene = project.find_scene(scene_id).ok_or(CoreError::NotFound {
            entity: "Scene",
            id: scene_id,
        })?;

        let draft = self
            .textgen
            .generate(
                &prompts::draft_prompt(&project.title, instruction),
                &prompts::draft_system_instruction(&scene.content),
            )
            .await?;

        let content = if scene.content.trim().is_empty() {
            draft
        } else {
            format!("{}\n\n{}", scene.content, draft)
        };

        self.apply_edit(
            project_id,
            ProjectPatch::Scene {
                scene_id,
                patch: ScenePatch::content(content),
            },
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
