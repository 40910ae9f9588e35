use std::path::PathBuf;

use gridsource_lib::error::ColumnDefError;
use gridsource_lib::error::DatasourceError;
use gridsource_lib::error::LoadError;
use gridsource_lib::error::StoreError;

/// Errors reported by the command line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Columns(#[from] ColumnDefError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Datasource(#[from] DatasourceError),

    #[error("could not read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no {0} layout is saved")]
    NoLayout(&'static str),

    #[error("no platform data directory; pass --db")]
    NoDataDir,
}
