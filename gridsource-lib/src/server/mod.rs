//! In-memory query server
//!
//! [`FakeServer`] holds a full dataset and answers [`Request`]s the way a
//! real backend for a server-side row model would: filter, group, sort,
//! count, then slice.

mod group;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use log::warn;

use crate::model::Row;
use crate::query::ComparatorKind;
use crate::query::FilterModel;
use crate::query::Request;
use crate::query::Response;
use crate::query::SortModelItem;

/// An in-memory row server.
///
/// The dataset is read-only once loaded and shared behind an `Arc`, so the
/// server is cheap to clone and safe to query from many tasks at once.
///
/// # Example
///
/// ```
/// use gridsource_lib::model::{Row, RowId};
/// use gridsource_lib::query::{Request, SortModelItem};
/// use gridsource_lib::FakeServer;
///
/// let server = FakeServer::new(vec![
///     Row::new(RowId::Leaf(1)).set("age", 24),
///     Row::new(RowId::Leaf(2)).set("age", 24),
///     Row::new(RowId::Leaf(3)).set("age", 20),
/// ]);
///
/// let response = server.get_data(&Request::range(0, 3).sort_by(SortModelItem::asc("age")));
/// let ids: Vec<String> = response.rows.iter().map(|r| r.id().to_string()).collect();
///
/// assert_eq!(ids, ["3", "1", "2"]);
/// assert_eq!(response.last_row, Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    rows: Arc<[Row]>,
    comparators: Arc<HashMap<String, ComparatorKind>>,
}

impl FakeServer {
    /// Creates a server holding the given rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            comparators: Arc::default(),
        }
    }

    /// Sets per-column comparators used when sorting.
    ///
    /// Columns without an entry use [`ComparatorKind::Default`].
    pub fn with_comparators(mut self, comparators: HashMap<String, ComparatorKind>) -> Self {
        self.comparators = Arc::new(comparators);
        self
    }

    /// Returns the full dataset.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the server holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Answers a row request.
    ///
    /// This never fails outward: a filter model that cannot be compiled
    /// yields an unsuccessful response, and a window outside the result
    /// yields a successful response with no rows.
    pub fn get_data(&self, request: &Request) -> Response {
        debug!(
            "Rows requested: [{}, {}) sort={:?} filters={} group_keys={:?}",
            request.start_row,
            request.end_row,
            request.sort_model,
            request.filter_model.len(),
            request.group_keys
        );

        let filters = match FilterModel::compile(&request.filter_model) {
            Ok(filters) => filters,
            Err(err) => {
                warn!("Rejecting row request: {}", err);
                return Response::failed();
            }
        };

        let mut matched: Vec<&Row> = self.rows.iter().filter(|row| filters.matches(row)).collect();

        // Expanded groups restrict the rows to those under the group path.
        for (key, column) in request.group_keys.iter().zip(&request.row_group_cols) {
            matched.retain(|row| row.value(&column.field).to_string() == *key);
        }

        if request.is_group_level() {
            let level = request.group_keys.len();
            let mut groups = group::group_rows(
                &matched,
                &request.row_group_cols[level],
                &request.group_keys,
                &request.value_cols,
            );
            self.sort_rows(&mut groups, &request.sort_model);
            let last_row = groups.len();
            Response::ok(slice(groups, request), last_row)
        } else {
            self.sort_rows(&mut matched, &request.sort_model);
            let last_row = matched.len();
            let rows = slice(matched, request).into_iter().cloned().collect();
            Response::ok(rows, last_row)
        }
    }

    /// Stable multi-key sort. Ties on every key keep their input order.
    fn sort_rows<R: Borrow<Row>>(&self, rows: &mut [R], sort_model: &[SortModelItem]) {
        if sort_model.is_empty() {
            return;
        }

        rows.sort_by(|a, b| {
            let (a, b): (&Row, &Row) = (a.borrow(), b.borrow());
            sort_model
                .iter()
                .map(|item| {
                    let comparator = self.comparator(&item.col_id);
                    item.sort
                        .apply(comparator.compare(a.value(&item.col_id), b.value(&item.col_id)))
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    fn comparator(&self, column: &str) -> ComparatorKind {
        self.comparators.get(column).copied().unwrap_or_default()
    }
}

/// Returns the `[start_row, end_row)` window of `rows`, clipped to its length.
fn slice<T>(rows: Vec<T>, request: &Request) -> Vec<T> {
    rows.into_iter()
        .skip(request.start_row)
        .take(request.block_size())
        .collect()
}
