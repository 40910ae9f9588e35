//! Column layout persistence
//!
//! Column layouts are saved as JSON text through an injected
//! [`LayoutStore`] whenever columns are moved, resized, shown or hidden,
//! and restored (without their sort) when a grid is mounted.

mod config;
mod persistence;
mod saver;
mod sqlite;
mod state;
mod store;

pub use config::*;
pub use persistence::*;
pub use saver::*;
pub use sqlite::*;
pub use state::*;
pub use store::*;
