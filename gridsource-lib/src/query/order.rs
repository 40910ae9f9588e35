//! Sort model types and value comparators.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use super::parse_date;
use crate::model::Value;

/// Sort direction for ordering rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// One entry of a request's sort model.
///
/// Entries are applied in order: the first is the primary key, later entries
/// break ties.
///
/// # Example
///
/// ```
/// use gridsource_lib::query::SortModelItem;
///
/// let sort = vec![SortModelItem::desc("gold"), SortModelItem::asc("athlete")];
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModelItem {
    /// The column to sort by.
    pub col_id: String,
    /// The sort direction.
    #[serde(alias = "direction")]
    pub sort: Direction,
}

impl SortModelItem {
    /// Creates an ascending sort on a column.
    pub fn asc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: Direction::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: Direction::Desc,
        }
    }
}

/// How values of a column compare when sorting.
///
/// Column definitions name a comparator; the name resolves to one of these
/// when the definitions are loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparatorKind {
    /// Natural value ordering ([`Value::total_cmp`]).
    #[default]
    Default,
    /// Parses both values as dates (`dd/mm/yyyy` or ISO).
    Date,
    /// Parses both values as numbers, including numeric strings.
    Number,
    /// Case-insensitive text comparison.
    Text,
}

impl ComparatorKind {
    /// Compares two cell values in ascending order.
    ///
    /// Values that cannot be read by the comparator sort before values that
    /// can, mirroring how nulls sort first.
    pub fn compare(self, a: &Value, b: &Value) -> Ordering {
        match self {
            ComparatorKind::Default => a.total_cmp(b),
            ComparatorKind::Date => {
                let read = |v: &Value| v.as_str().and_then(parse_date);
                read(a).cmp(&read(b))
            }
            ComparatorKind::Number => {
                let read = |v: &Value| match v {
                    Value::Number(n) => Some(*n),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                match (read(a), read(b)) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (x, y) => x.is_some().cmp(&y.is_some()),
                }
            }
            ComparatorKind::Text => {
                if a.is_null() || b.is_null() {
                    return (!a.is_null()).cmp(&!b.is_null());
                }
                a.to_string().to_lowercase().cmp(&b.to_string().to_lowercase())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sort_alias() {
        let item: SortModelItem = serde_json::from_str(r#"{"colId":"age","direction":"asc"}"#).unwrap();
        assert_eq!(item, SortModelItem::asc("age"));

        let item: SortModelItem = serde_json::from_str(r#"{"colId":"age","sort":"desc"}"#).unwrap();
        assert_eq!(item, SortModelItem::desc("age"));
    }

    #[test]
    fn test_date_comparator() {
        let earlier = Value::from("24/08/2004");
        let later = Value::from("01/02/2008");
        assert_eq!(ComparatorKind::Date.compare(&earlier, &later), Ordering::Less);
        // Lexically "24/..." sorts after "01/..."
        assert_eq!(ComparatorKind::Default.compare(&earlier, &later), Ordering::Greater);
    }

    #[test]
    fn test_number_comparator_reads_strings() {
        let ordering = ComparatorKind::Number.compare(&Value::from("9"), &Value::from("10"));
        assert_eq!(ordering, Ordering::Less);
        let ordering = ComparatorKind::Number.compare(&Value::Null, &Value::from(1));
        assert_eq!(ordering, Ordering::Less);
    }

    #[test]
    fn test_text_comparator_ignores_case() {
        let ordering = ComparatorKind::Text.compare(&Value::from("alpha"), &Value::from("Beta"));
        assert_eq!(ordering, Ordering::Less);
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(Direction::Desc.apply(Ordering::Less), Ordering::Greater);
    }
}
