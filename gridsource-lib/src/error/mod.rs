//! Error types

mod column;
mod datasource;
mod load;
mod query;
mod store;

pub use column::*;
pub use datasource::*;
pub use load::*;
pub use query::*;
pub use store::*;
