//! Response type and page arithmetic.

use serde::Serialize;
use serde::Serializer;

use super::Request;
use crate::model::Row;

/// The server's answer to a [`Request`].
///
/// `last_row` is the total number of rows matching the request, independent
/// of the requested window. It is `None` when the total is unknown, which is
/// serialized as `-1` the way grids expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Whether the request could be answered.
    pub success: bool,
    /// The requested slice of rows.
    pub rows: Vec<Row>,
    /// Total matching row count, if known.
    #[serde(serialize_with = "serialize_last_row")]
    pub last_row: Option<usize>,
}

impl Response {
    /// Creates a successful response.
    pub fn ok(rows: Vec<Row>, last_row: usize) -> Self {
        Self {
            success: true,
            rows,
            last_row: Some(last_row),
        }
    }

    /// Creates a failed response with no rows.
    pub fn failed() -> Self {
        Self {
            success: false,
            rows: Vec::new(),
            last_row: None,
        }
    }

    /// Returns the number of rows in this response.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if this response carries no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn serialize_last_row<S: Serializer>(last_row: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
    match last_row {
        Some(n) => serializer.serialize_u64(*n as u64),
        None => serializer.serialize_i64(-1),
    }
}

/// Converts page indexes into request windows.
///
/// # Example
///
/// ```
/// use gridsource_lib::query::{Pagination, Request};
///
/// let pages = Pagination::new(100);
/// let request = pages.request_for_page(2, &Request::default());
///
/// assert_eq!((request.start_row, request.end_row), (200, 300));
/// assert_eq!(pages.page_count(Some(8618)), Some(87));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
}

impl Default for Pagination {
    /// Grids default to pages of 100 rows.
    fn default() -> Self {
        Self { page_size: 100 }
    }
}

impl Pagination {
    /// Creates a pagination with the given page size (at least 1).
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns a copy of `base` windowed to the given zero-based page.
    pub fn request_for_page(&self, page: usize, base: &Request) -> Request {
        let start_row = page.saturating_mul(self.page_size);
        Request {
            start_row,
            end_row: start_row.saturating_add(self.page_size),
            ..base.clone()
        }
    }

    /// Returns the number of pages for a total row count, if known.
    pub fn page_count(&self, last_row: Option<usize>) -> Option<usize> {
        last_row.map(|rows| rows.div_ceil(self.page_size))
    }

    /// Returns the zero-based page containing the given row.
    pub fn page_of(&self, row: usize) -> usize {
        row / self.page_size
    }
}
