//! Row request and response types.
//!
//! These types mirror the request a server-side row model sends when it
//! needs a block of rows, and the response it expects back.
//!
//! - [`Request`] - the block window, sort model, filter model and grouping
//! - [`Filter`] - a compiled filter condition for one column
//! - [`SortModelItem`] / [`ComparatorKind`] - sort keys and how they compare
//! - [`Response`] - the served rows and the total row count
//! - [`Pagination`] - page index to request window conversion

mod date;
mod filter;
mod order;
mod page;
mod request;

pub use date::parse_date;
pub use filter::DateCondition;
pub use filter::Filter;
pub use filter::FilterModel;
pub use filter::NumberCondition;
pub use filter::TextCondition;
pub use order::ComparatorKind;
pub use order::Direction;
pub use order::SortModelItem;
pub use page::Pagination;
pub use page::Response;
pub use request::AggFunc;
pub use request::ColumnVo;
pub use request::Request;
