//! Datasource adapter
//!
//! Bridges the grid's callback-based "get rows" contract to a
//! [`FakeServer`]. Every request is answered by exactly one call to its
//! success or fail callback, on a spawned task after the configured latency.

mod config;
mod params;

pub use config::*;
pub use params::*;

use log::debug;
use tokio::runtime::Handle;

use crate::error::DatasourceError;
use crate::query::Request;
use crate::query::Response;
use crate::server::FakeServer;

/// The contract a server-side row model uses to request rows.
///
/// Implementations must eventually complete every `params` exactly once.
/// The type of [`GetRowsParams`] already rules out completing twice.
pub trait ServerSideDatasource: Send + Sync {
    /// Requests a block of rows.
    fn get_rows(&self, params: GetRowsParams);
}

/// A datasource backed by an in-memory [`FakeServer`].
///
/// The server response is computed when the request arrives; only its
/// delivery is delayed. Concurrent requests share nothing but the read-only
/// dataset, so each completes independently. A response that arrives after
/// the grid has moved on is still delivered.
///
/// # Example
///
/// ```ignore
/// use gridsource_lib::{Datasource, DatasourceConfig, FakeServer};
/// use gridsource_lib::query::Request;
///
/// let datasource = Datasource::new(FakeServer::new(rows))
///     .with_config(DatasourceConfig::no_latency());
///
/// let block = datasource.fetch_rows(Request::range(0, 100)).await?;
/// println!("{} of {:?} rows", block.row_data.len(), block.row_count);
/// ```
#[derive(Debug, Clone)]
pub struct Datasource {
    server: FakeServer,
    config: DatasourceConfig,
}

impl Datasource {
    /// Creates a datasource over the given server with default config.
    pub fn new(server: FakeServer) -> Self {
        Self {
            server,
            config: DatasourceConfig::default(),
        }
    }

    /// Sets the datasource config.
    pub fn with_config(mut self, config: DatasourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the underlying server.
    pub fn server(&self) -> &FakeServer {
        &self.server
    }

    /// Returns the datasource config.
    pub fn config(&self) -> &DatasourceConfig {
        &self.config
    }

    /// Requests rows and waits for the outcome.
    pub async fn fetch_rows(&self, request: Request) -> Result<RowBlock, DatasourceError> {
        let (params, outcome) = GetRowsParams::channel(request);
        self.get_rows(params);

        match outcome.await {
            Ok(RowsOutcome::Success(block)) => Ok(block),
            Ok(RowsOutcome::Fail) => Err(DatasourceError::Failed),
            Err(_) => Err(DatasourceError::Dropped),
        }
    }
}

impl ServerSideDatasource for Datasource {
    fn get_rows(&self, params: GetRowsParams) {
        debug!("[Datasource] rows requested by grid: {:?}", params.request());
        let response = self.server.get_data(params.request());

        // Without a runtime there is nothing to defer to; complete inline.
        let Ok(handle) = Handle::try_current() else {
            complete(params, response);
            return;
        };

        let latency = self.config.latency;
        handle.spawn(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            complete(params, response);
        });
    }
}

fn complete(params: GetRowsParams, response: Response) {
    if response.success {
        params.success(response.rows, response.last_row);
    } else {
        params.fail();
    }
}
