//! Datasource errors

/// Errors surfaced to callers awaiting a row request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasourceError {
    /// The server rejected the request.
    #[error("row request failed")]
    Failed,

    /// The request was dropped before completing.
    #[error("row request was dropped before completion")]
    Dropped,
}
