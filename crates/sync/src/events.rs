//! In-process event bus for sync outcomes.
//!
//! [`SyncEventBus`] is the publish/subscribe hub over which durable-write
//! results and scan outcomes are reported to whoever is listening (the
//! binary's logging task today, a UI push channel tomorrow). Publishing
//! never blocks and never fails: with zero subscribers an event is
//! silently dropped.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// An outcome the sync engine wants the outside world to know about.
///
/// `SaveFailed` is the whole of the failure-handling policy for
/// background writes: the in-memory copy is preserved as the author's
/// working copy, the failure is reported exactly once, and nothing is
/// retried or rolled back.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SyncEvent {
    #[serde(rename_all = "camelCase")]
    ProjectSaved { project_id: Uuid, word_count: u32 },
    #[serde(rename_all = "camelCase")]
    SaveFailed { project_id: Uuid, reason: String },
    #[serde(rename_all = "camelCase")]
    ProjectDeleted { project_id: Uuid },
    #[serde(rename_all = "camelCase")]
    ScanCompleted {
        project_id: Uuid,
        created: u32,
        updated: u32,
        skipped_locked: u32,
    },
}

/// In-process fan-out bus for [`SyncEvent`]s.
#[derive(Clone)]
pub struct SyncEventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl SyncEventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: SyncEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

impl Default for SyncEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
