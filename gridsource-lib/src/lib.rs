//! Server-side row model library
//!
//! A headless data layer for paginated data grids: an in-memory query server,
//! a callback-based datasource adapter, column definitions and column layout
//! persistence.

pub mod columns;
pub mod datasource;
pub mod error;
pub mod layout;
pub mod loader;
pub mod model;
pub mod query;
pub mod server;

pub use datasource::Datasource;
pub use datasource::DatasourceConfig;
pub use datasource::GetRowsParams;
pub use model::Row;
pub use model::RowId;
pub use model::Value;
pub use query::Request;
pub use query::Response;
pub use server::FakeServer;
