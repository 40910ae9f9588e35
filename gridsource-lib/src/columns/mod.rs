//! Column definitions
//!
//! Column groups and columns as a grid is configured with them. Definitions
//! may be loaded from JSON, in which case renderer and comparator names are
//! resolved to [`CellRendererKind`] and [`ComparatorKind`] when loading.
//!
//! [`ComparatorKind`]: crate::query::ComparatorKind

mod def;
mod renderer;

pub use def::*;
pub use renderer::*;
