/// Errors from the durable store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected or failed the operation.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored project document could not be (de)serialized.
    #[error("Project document codec error: {0}")]
    Document(#[from] serde_json::Error),
}
