//! Grid row with stable identity

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::Value;

/// Field that carries a row's identifier in its serialized form.
pub const ID_FIELD: &str = "id";

/// Field that carries the number of leaf rows under a group row.
pub const CHILD_COUNT_FIELD: &str = "childCount";

/// Stable identifier of a row.
///
/// Leaf rows are numbered sequentially from 1 when a dataset is loaded.
/// Group rows are identified by the path of group keys leading to them,
/// displayed as `group:` followed by the keys joined with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    /// A leaf row loaded from the dataset.
    Leaf(u64),
    /// A group row built from the given group-key path.
    Group(Vec<String>),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Leaf(id) => write!(f, "{}", id),
            RowId::Group(path) => {
                f.write_str("group:")?;
                for (i, key) in path.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write_escaped_key(f, key)?;
                }
                Ok(())
            }
        }
    }
}

/// Writes a group key with `\` and `/` escaped, so distinct paths never
/// render the same.
fn write_escaped_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    for c in key.chars() {
        if c == '\\' || c == '/' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

/// A row served to the grid.
///
/// Rows hold field values in a sorted map so that serialization is
/// deterministic. The identifier is also exposed as the `id` field, which is
/// how the grid reads it back.
///
/// # Example
///
/// ```
/// use gridsource_lib::model::{Row, RowId, Value};
///
/// let row = Row::new(RowId::Leaf(1))
///     .set("athlete", "Michael Phelps")
///     .set("age", 23);
///
/// assert_eq!(row.get("age"), Some(&Value::from(23)));
/// assert_eq!(row.id().to_string(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    #[serde(skip)]
    id: RowId,
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row with the given identifier.
    pub fn new(id: RowId) -> Self {
        let id_value = match &id {
            RowId::Leaf(n) => Value::from(*n),
            RowId::Group(_) => Value::String(id.to_string()),
        };
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_string(), id_value);
        Self { id, fields }
    }

    /// Creates a leaf row from a JSON object.
    ///
    /// Any `id` field in the object is replaced by the assigned identifier.
    pub fn from_json_object(id: u64, object: serde_json::Map<String, serde_json::Value>) -> Self {
        object
            .into_iter()
            .fold(Row::new(RowId::Leaf(id)), |row, (field, value)| {
                row.set(field, Value::from(value))
            })
    }

    /// Returns the row identifier.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Returns `true` if this is a group row.
    pub fn is_group(&self) -> bool {
        matches!(self.id, RowId::Group(_))
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field value, treating missing fields as null.
    pub fn value(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Sets a field value.
    ///
    /// The `id` field is owned by the row identifier and cannot be replaced.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        if field != ID_FIELD {
            self.fields.insert(field, value.into());
        }
        self
    }
}

/// Returns the row identifier as the string the grid tracks rows by.
pub fn row_id_string(row: &Row) -> String {
    row.id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_object_replaces_id() {
        let object = serde_json::json!({"id": 99, "athlete": "Ian Thorpe", "age": 17});
        let serde_json::Value::Object(map) = object else {
            unreachable!()
        };

        let row = Row::from_json_object(5, map);
        assert_eq!(row.id(), &RowId::Leaf(5));
        assert_eq!(row.get("id"), Some(&Value::from(5)));
        assert_eq!(row.get("athlete"), Some(&Value::from("Ian Thorpe")));
    }

    #[test]
    fn test_row_id_string() {
        let leaf = Row::new(RowId::Leaf(17));
        assert_eq!(row_id_string(&leaf), "17");

        let group = Row::new(RowId::Group(vec!["USA".into(), "2008".into()]));
        assert_eq!(row_id_string(&group), "group:USA/2008");
        assert!(group.is_group());
    }

    #[test]
    fn test_group_ids_with_separator_do_not_collide() {
        let top = RowId::Group(vec!["x/y".into()]);
        let nested = RowId::Group(vec!["x".into(), "y".into()]);
        assert_ne!(top.to_string(), nested.to_string());
        assert_eq!(top.to_string(), r"group:x\/y");

        let backslash = RowId::Group(vec![r"x\".into(), "y".into()]);
        assert_eq!(backslash.to_string(), r"group:x\\/y");
        assert_ne!(backslash.to_string(), top.to_string());
    }

    #[test]
    fn test_serialize_flat() {
        let row = Row::new(RowId::Leaf(1)).set("age", 24).set("country", "USA");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"age":24,"country":"USA","id":1}"#);
    }

    #[test]
    fn test_missing_field_is_null() {
        let row = Row::new(RowId::Leaf(1));
        assert!(row.value("sport").is_null());
    }
}
