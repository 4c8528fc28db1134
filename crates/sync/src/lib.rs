//! Inkstone sync engine.
//!
//! Owns the in-memory authoritative copy of every open project and the
//! discipline that keeps it consistent with the durable store:
//!
//! - [`Workspace`] — the in-memory project set; every edit commits here
//!   synchronously and optimistically.
//! - [`SaveDebouncer`] — per-scene single-shot timers that coalesce rapid
//!   content edits into one durable write after a quiet period.
//! - [`SyncController`] — the surface the HTTP layer calls: edits,
//!   project lifecycle, the AI codex scan, manual imports, and drafting.
//! - [`SyncEventBus`] — broadcast channel reporting save/scan outcomes.
//!   Durable-write failures are *reported* here and never rolled back:
//!   undoing the in-memory commit would discard keystrokes the author
//!   believes are saved.

pub mod controller;
pub mod debounce;
pub mod events;
pub mod persist;
pub mod workspace;

pub use controller::{SyncController, SyncError, TextService};
pub use debounce::{SaveDebouncer, CONTENT_SAVE_DEBOUNCE};
pub use events::{SyncEvent, SyncEventBus};
pub use persist::{PgProjectStore, ProjectStore};
pub use workspace::Workspace;
