//! Debounced durable writes for scene content.
//!
//! Keystroke-level content edits arrive far faster than they should be
//! written out. Each open scene gets at most one pending single-shot
//! timer; every qualifying edit re-arms it, and only when a quiet period
//! passes does the write fire — carrying whatever content the workspace
//! holds *at that moment*. Navigating away from a scene must not lose the
//! pending write, so [`SaveDebouncer::flush_scene`] runs it immediately
//! instead of waiting for the timer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::events::SyncEventBus;
use crate::persist::{persist_latest, ProjectStore};
use crate::workspace::Workspace;

/// Quiet period after the last content edit before the durable write fires.
pub const CONTENT_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

struct PendingSave {
    project_id: Uuid,
    handle: JoinHandle<()>,
}

/// Per-scene save timers over the shared workspace and store.
pub struct SaveDebouncer {
    delay: Duration,
    workspace: Arc<Workspace>,
    store: Arc<dyn ProjectStore>,
    events: SyncEventBus,
    /// Pending timers keyed by scene id. Invariant: at most one per scene.
    /// Shared with the timer tasks so a fired timer can deregister itself.
    pending: Arc<Mutex<HashMap<Uuid, PendingSave>>>,
}

impl SaveDebouncer {
    pub fn new(
        delay: Duration,
        workspace: Arc<Workspace>,
        store: Arc<dyn ProjectStore>,
        events: SyncEventBus,
    ) -> Self {
        Self {
            delay,
            workspace,
            store,
            events,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm (or re-arm) the save timer for a scene.
    ///
    /// An already-pending timer for the same scene is cancelled first, so
    /// rapid edits coalesce into a single write after the quiet period.
    pub async fn schedule(&self, project_id: Uuid, scene_id: Uuid) {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.remove(&scene_id) {
            previous.handle.abort();
        }

        let workspace = Arc::clone(&self.workspace);
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        let pending_map = Arc::clone(&self.pending);
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Deregister before writing so a concurrent flush cannot
            // observe a timer that is already running.
            pending_map.lock().await.remove(&scene_id);
            persist_latest(&workspace, &store, &events, project_id).await;
        });

        pending.insert(scene_id, PendingSave { project_id, handle });
    }

    /// Run a scene's pending write immediately, if any.
    ///
    /// Called when the author navigates away from the scene — the pending
    /// content must not ride on a timer that may never get its quiet
    /// period.
    pub async fn flush_scene(&self, scene_id: Uuid) {
        let pending = self.pending.lock().await.remove(&scene_id);
        if let Some(save) = pending {
            save.handle.abort();
            persist_latest(&self.workspace, &self.store, &self.events, save.project_id).await;
        }
    }

    /// Run every pending write immediately (shutdown path).
    pub async fn flush_all(&self) {
        let drained: Vec<PendingSave> = {
            let mut pending = self.pending.lock().await;
            pending.drain().map(|(_, save)| save).collect()
        };
        for save in drained {
            save.handle.abort();
            persist_latest(&self.workspace, &self.store, &self.events, save.project_id).await;
        }
    }

    /// Whether a scene currently has a pending timer.
    pub async fn has_pending(&self, scene_id: Uuid) -> bool {
        self.pending.lock().await.contains_key(&scene_id)
    }
}
