//! Data model types
//!
//! - [`Value`] - a dynamic field value
//! - [`Row`] - a record of named fields with a stable [`RowId`]

mod row;
mod value;

pub use row::*;
pub use value::*;
