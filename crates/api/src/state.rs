use std::sync::Arc;

use inkstone_sync::SyncController;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (used directly only by the health check;
    /// everything else goes through the controller).
    pub pool: inkstone_db::DbPool,
    /// The sync engine: edits, persistence scheduling, AI flows.
    pub controller: Arc<SyncController>,
}
