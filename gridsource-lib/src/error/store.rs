//! Layout store errors

/// Errors from a [`LayoutStore`](crate::layout::LayoutStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite backend error.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// The layout could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
