//! Row request sent by a server-side row model.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::SortModelItem;

/// Aggregation applied to a value column when rows are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    /// Sum of numeric values.
    Sum,
    /// Smallest numeric value.
    Min,
    /// Largest numeric value.
    Max,
    /// Mean of numeric values.
    Avg,
    /// Number of rows in the group.
    Count,
    /// Value of the first row in the group.
    First,
    /// Value of the last row in the group.
    Last,
}

/// A column referenced by the grouping part of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnVo {
    /// Column id.
    pub id: String,
    /// Field the column reads.
    pub field: String,
    /// Header text, if the grid sent it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Aggregation for value columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agg_func: Option<AggFunc>,
}

impl ColumnVo {
    /// Creates a column reference whose id and field are the same.
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            id: field.clone(),
            field,
            display_name: None,
            agg_func: None,
        }
    }

    /// Sets the aggregation function.
    pub fn with_agg_func(mut self, agg_func: AggFunc) -> Self {
        self.agg_func = Some(agg_func);
        self
    }
}

/// A request for a block of rows.
///
/// Rows `[start_row, end_row)` of the filtered, sorted (and possibly
/// grouped) result are requested. Field names match the JSON the grid sends,
/// so requests can be deserialized directly.
///
/// # Example
///
/// ```
/// use gridsource_lib::query::{Request, SortModelItem};
///
/// let request = Request::range(0, 100)
///     .sort_by(SortModelItem::desc("gold"))
///     .filter("country", serde_json::json!({"type": "equals", "filter": "USA"}));
///
/// assert_eq!(request.block_size(), 100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    /// First row of the block (inclusive).
    pub start_row: usize,
    /// End of the block (exclusive).
    pub end_row: usize,
    /// Sort keys in priority order.
    pub sort_model: Vec<SortModelItem>,
    /// Raw filter spec per column id.
    pub filter_model: HashMap<String, serde_json::Value>,
    /// Keys of the group being expanded, outermost first.
    pub group_keys: Vec<String>,
    /// Columns the rows are grouped by, outermost first.
    pub row_group_cols: Vec<ColumnVo>,
    /// Columns aggregated into group rows.
    pub value_cols: Vec<ColumnVo>,
}

impl Request {
    /// Creates a request for rows `[start_row, end_row)`.
    pub fn range(start_row: usize, end_row: usize) -> Self {
        Self {
            start_row,
            end_row,
            ..Self::default()
        }
    }

    /// Adds a sort key after any existing ones.
    pub fn sort_by(mut self, item: SortModelItem) -> Self {
        self.sort_model.push(item);
        self
    }

    /// Sets the filter spec for a column.
    pub fn filter(mut self, column: impl Into<String>, spec: serde_json::Value) -> Self {
        self.filter_model.insert(column.into(), spec);
        self
    }

    /// Adds a row group column.
    pub fn group_by(mut self, column: ColumnVo) -> Self {
        self.row_group_cols.push(column);
        self
    }

    /// Adds a value column aggregated into group rows.
    pub fn aggregate(mut self, column: ColumnVo) -> Self {
        self.value_cols.push(column);
        self
    }

    /// Sets the group keys of the group being expanded.
    pub fn with_group_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.group_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the number of rows requested, zero for inverted windows.
    pub fn block_size(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }

    /// Returns `true` if this request asks for group rows rather than leaves.
    pub fn is_group_level(&self) -> bool {
        self.row_group_cols.len() > self.group_keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Direction;

    #[test]
    fn test_deserialize_grid_request() {
        let json = r#"{
            "startRow": 100,
            "endRow": 200,
            "rowGroupCols": [{"id": "country", "displayName": "Country", "field": "country"}],
            "valueCols": [{"id": "gold", "field": "gold", "aggFunc": "sum"}],
            "pivotCols": [],
            "pivotMode": false,
            "groupKeys": [],
            "filterModel": {"age": {"filterType": "number", "type": "lessThan", "filter": 25}},
            "sortModel": [{"colId": "athlete", "sort": "asc"}]
        }"#;

        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(request.start_row, 100);
        assert_eq!(request.block_size(), 100);
        assert_eq!(request.sort_model[0].sort, Direction::Asc);
        assert_eq!(request.value_cols[0].agg_func, Some(AggFunc::Sum));
        assert!(request.is_group_level());
    }

    #[test]
    fn test_missing_fields_default() {
        let request: Request = serde_json::from_str(r#"{"startRow": 0, "endRow": 10}"#).unwrap();
        assert!(request.sort_model.is_empty());
        assert!(request.filter_model.is_empty());
        assert!(!request.is_group_level());
    }

    #[test]
    fn test_inverted_window_has_no_rows() {
        assert_eq!(Request::range(10, 5).block_size(), 0);
    }
}
