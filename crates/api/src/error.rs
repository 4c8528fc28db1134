use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inkstone_core::error::CoreError;
use inkstone_sync::SyncError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`SyncError`] for everything coming out of the sync engine and
/// adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from the sync engine (domain, store, or text service).
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Sync(SyncError::Core(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Sync(sync) => match sync {
                SyncError::Core(core) => match core {
                    CoreError::NotFound { entity, id } => (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("{entity} with id {id} not found"),
                    ),
                    CoreError::Validation(msg) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                    }
                    // The generative service answered, but with something
                    // we could not parse — an upstream fault, not a client
                    // one. The codex was left untouched.
                    CoreError::Parse(msg) => {
                        (StatusCode::BAD_GATEWAY, "EXTRACTION_PARSE_ERROR", msg.clone())
                    }
                },
                SyncError::Store(err) => {
                    tracing::error!(error = %err, "Awaited store operation failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_ERROR",
                        "Persistence failed; your working copy is unchanged".to_string(),
                    )
                }
                SyncError::Service(err) => (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    err.to_string(),
                ),
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
