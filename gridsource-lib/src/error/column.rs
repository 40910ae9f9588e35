//! Column definition errors

use super::LoadError;

/// Errors that can occur while resolving column definitions.
#[derive(Debug, thiserror::Error)]
pub enum ColumnDefError {
    /// The definitions could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A `cellRenderer` name has no known renderer.
    #[error("Unknown cell renderer '{name}' on column '{column}'")]
    UnknownRenderer {
        /// Column the renderer was requested for.
        column: String,
        /// The unresolved renderer name.
        name: String,
    },

    /// A `comparator` name has no known comparator.
    #[error("Unknown comparator '{name}' on column '{column}'")]
    UnknownComparator {
        /// Column the comparator was requested for.
        column: String,
        /// The unresolved comparator name.
        name: String,
    },

    /// Two columns share the same id.
    #[error("Duplicate column id '{0}'")]
    DuplicateColumn(String),
}
