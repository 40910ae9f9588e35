//! Dataset and column definition loading
//!
//! Datasets are JSON arrays of flat objects, loaded whole once per session.
//! Each row gets a sequential id starting at 1 as it is loaded.

mod config;
mod source;

pub use config::*;
pub use source::*;

use std::path::Path;

use log::debug;
use reqwest::Client;

use crate::columns::ColumnDefs;
use crate::error::ColumnDefError;
use crate::error::LoadError;
use crate::error::json_type_name;
use crate::model::Row;

/// Loads datasets and column definitions from URLs or files.
///
/// Cheap to clone; clones share the HTTP connection pool.
///
/// # Example
///
/// ```ignore
/// use gridsource_lib::loader::{DatasetLoader, Source};
///
/// let loader = DatasetLoader::new();
/// let rows = loader.load_rows(&Source::olympic_winners()?).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    http_client: Client,
    config: LoaderConfig,
}

impl DatasetLoader {
    /// Creates a loader with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the loader config.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads a dataset and assigns row ids.
    pub async fn load_rows(&self, source: &Source) -> Result<Vec<Row>, LoadError> {
        let json = self.load_json(source).await?;
        let rows = rows_from_json(json)?;
        debug!("Loaded {} rows from {}", rows.len(), source);
        Ok(rows)
    }

    /// Loads and resolves column definitions.
    pub async fn load_column_defs(&self, source: &Source) -> Result<ColumnDefs, ColumnDefError> {
        let json = self.load_json(source).await?;
        ColumnDefs::from_json(json)
    }

    /// Loads a JSON document.
    pub async fn load_json(&self, source: &Source) -> Result<serde_json::Value, LoadError> {
        match source {
            Source::Url(url) => self.fetch_json(url.as_str()).await,
            Source::File(path) => read_json_file(path).await,
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, LoadError> {
        let mut request = self.http_client.get(url);
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        if response.status().is_success() {
            response.json().await.map_err(|e| self.classify(e))
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(LoadError::http(status, body))
        }
    }

    fn classify(&self, err: reqwest::Error) -> LoadError {
        match self.config.timeout {
            Some(timeout) if err.is_timeout() => LoadError::Timeout(timeout),
            _ => LoadError::Network(err),
        }
    }
}

async fn read_json_file(path: &Path) -> Result<serde_json::Value, LoadError> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

/// Builds rows from a JSON array of objects, numbering them from 1.
///
/// # Example
///
/// ```
/// use gridsource_lib::loader::rows_from_json;
/// use gridsource_lib::model::RowId;
///
/// let rows = rows_from_json(serde_json::json!([
///     {"athlete": "Michael Phelps", "age": 23},
///     {"athlete": "Natalie Coughlin", "age": 25}
/// ])).unwrap();
///
/// assert_eq!(rows[1].id(), &RowId::Leaf(2));
/// ```
pub fn rows_from_json(json: serde_json::Value) -> Result<Vec<Row>, LoadError> {
    let items = match json {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(LoadError::NotAnArray {
                found: json_type_name(&other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::Object(object) => Ok(Row::from_json_object(index as u64 + 1, object)),
            other => Err(LoadError::NotAnObject {
                index,
                found: json_type_name(&other),
            }),
        })
        .collect()
}

/// Parses rows from JSON text. See [`rows_from_json`].
pub fn rows_from_str(text: &str) -> Result<Vec<Row>, LoadError> {
    rows_from_json(serde_json::from_str(text)?)
}
