//! Column filters compiled from a request's filter model.
//!
//! The grid sends one filter spec per column as loosely typed JSON, for
//! example:
//!
//! ```json
//! {
//!   "country": { "filterType": "text", "type": "contains", "filter": "us" },
//!   "age": { "filterType": "number", "type": "inRange", "filter": 20, "filterTo": 30 },
//!   "sport": { "filterType": "set", "values": ["Swimming", "Rowing"] }
//! }
//! ```
//!
//! Specs are compiled once per request into [`Filter`] values, so malformed
//! specs are rejected before any row is examined.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Map;
use serde_json::Value as Json;

use super::parse_date;
use crate::error::QueryError;
use crate::model::Row;
use crate::model::Value;

/// A text filter condition. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub enum TextCondition {
    /// Cell text equals the operand.
    Equals(String),
    /// Cell text differs from the operand.
    NotEqual(String),
    /// Cell text contains the operand.
    Contains(String),
    /// Cell text does not contain the operand.
    NotContains(String),
    /// Cell text starts with the operand.
    StartsWith(String),
    /// Cell text ends with the operand.
    EndsWith(String),
    /// Cell is null or empty.
    Blank,
    /// Cell has a value.
    NotBlank,
}

/// A numeric filter condition. Blank cells only match [`NumberCondition::Blank`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumberCondition {
    /// `cell == operand`
    Equals(f64),
    /// `cell != operand`
    NotEqual(f64),
    /// `cell < operand`
    LessThan(f64),
    /// `cell <= operand`
    LessThanOrEqual(f64),
    /// `cell > operand`
    GreaterThan(f64),
    /// `cell >= operand`
    GreaterThanOrEqual(f64),
    /// `from <= cell <= to`
    InRange(f64, f64),
    /// Cell is null or empty.
    Blank,
    /// Cell has a value.
    NotBlank,
}

/// A date filter condition. Blank or unparseable cells only match
/// [`DateCondition::Blank`].
#[derive(Debug, Clone, PartialEq)]
pub enum DateCondition {
    /// Same day as the operand.
    Equals(NaiveDate),
    /// Different day from the operand.
    NotEqual(NaiveDate),
    /// Strictly before the operand.
    LessThan(NaiveDate),
    /// Strictly after the operand.
    GreaterThan(NaiveDate),
    /// Strictly between the two operands.
    InRange(NaiveDate, NaiveDate),
    /// Cell is null or empty.
    Blank,
    /// Cell has a value.
    NotBlank,
}

/// A compiled filter for a single column.
///
/// # Example
///
/// ```
/// use gridsource_lib::model::Value;
/// use gridsource_lib::query::Filter;
///
/// let spec = serde_json::json!({"filterType": "number", "type": "inRange", "filter": 20, "filterTo": 30});
/// let filter = Filter::compile("age", &spec).unwrap();
///
/// assert!(filter.matches(&Value::from(24)));
/// assert!(!filter.matches(&Value::from(31)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Text condition.
    Text(TextCondition),
    /// Numeric condition.
    Number(NumberCondition),
    /// Date condition.
    Date(DateCondition),
    /// Cell text is one of the listed values (`None` selects blanks).
    Set(Vec<Option<String>>),
    /// All conditions match.
    And(Vec<Filter>),
    /// Any condition matches.
    Or(Vec<Filter>),
}

impl Filter {
    /// Compiles the filter spec sent for `column`.
    ///
    /// When `filterType` is omitted it is inferred: a `values` list selects a
    /// set filter, a `dateFrom` a date filter, a numeric operand a number
    /// filter, and anything else a text filter. The operand is read from
    /// `filter`, or from `value` when `filter` is absent.
    pub fn compile(column: &str, spec: &Json) -> Result<Filter, QueryError> {
        let spec = spec.as_object().ok_or_else(|| QueryError::MalformedFilter {
            column: column.to_string(),
        })?;
        compile_spec(column, spec, None)
    }

    /// Returns `true` if the cell value passes this filter.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Filter::Text(condition) => text_matches(condition, value),
            Filter::Number(condition) => number_matches(condition, value),
            Filter::Date(condition) => date_matches(condition, value),
            Filter::Set(values) => {
                let cell = (!value.is_blank()).then(|| value.to_string());
                values.contains(&cell)
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(value)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(value)),
        }
    }
}

/// The compiled filters of a request, keyed by column id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterModel {
    filters: BTreeMap<String, Filter>,
}

impl FilterModel {
    /// Compiles every column spec of a raw filter model.
    pub fn compile(raw: &HashMap<String, Json>) -> Result<FilterModel, QueryError> {
        let filters = raw
            .iter()
            .map(|(column, spec)| Ok((column.clone(), Filter::compile(column, spec)?)))
            .collect::<Result<_, QueryError>>()?;
        Ok(FilterModel { filters })
    }

    /// Returns `true` if no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the filter for a column, if any.
    pub fn get(&self, column: &str) -> Option<&Filter> {
        self.filters.get(column)
    }

    /// Returns `true` if the row passes every column filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|(column, filter)| filter.matches(row.value(column)))
    }
}

// =============================================================================
// Compilation
// =============================================================================

fn compile_spec(
    column: &str,
    spec: &Map<String, Json>,
    inherited_type: Option<&str>,
) -> Result<Filter, QueryError> {
    // Only an explicit type is handed down; untyped conditions infer their own.
    let explicit_type = spec.get("filterType").and_then(Json::as_str).or(inherited_type);

    if let Some(conditions) = combined_conditions(spec) {
        let conditions = conditions
            .into_iter()
            .map(|condition| {
                let condition = condition.as_object().ok_or_else(|| QueryError::MalformedFilter {
                    column: column.to_string(),
                })?;
                compile_spec(column, condition, explicit_type)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let operator = spec.get("operator").and_then(Json::as_str).unwrap_or("AND");
        return match operator.to_ascii_uppercase().as_str() {
            "AND" => Ok(Filter::And(conditions)),
            "OR" => Ok(Filter::Or(conditions)),
            _ => Err(QueryError::UnsupportedOperator {
                column: column.to_string(),
                filter_type: "combined",
                operator: operator.to_string(),
            }),
        };
    }

    let filter_type = explicit_type.unwrap_or_else(|| infer_filter_type(spec));
    match filter_type {
        "text" => compile_text(column, spec).map(Filter::Text),
        "number" => compile_number(column, spec).map(Filter::Number),
        "date" => compile_date(column, spec).map(Filter::Date),
        "set" => compile_set(column, spec),
        other => Err(QueryError::UnsupportedFilterType {
            column: column.to_string(),
            filter_type: other.to_string(),
        }),
    }
}

fn infer_filter_type(spec: &Map<String, Json>) -> &'static str {
    if spec.contains_key("values") {
        "set"
    } else if spec.contains_key("dateFrom") {
        "date"
    } else if operand(spec).is_some_and(Json::is_number) {
        "number"
    } else {
        "text"
    }
}

/// Returns the sub-conditions of a combined filter, if this is one.
fn combined_conditions(spec: &Map<String, Json>) -> Option<Vec<&Json>> {
    if let Some(conditions) = spec.get("conditions").and_then(Json::as_array) {
        return Some(conditions.iter().collect());
    }
    match (spec.get("condition1"), spec.get("condition2")) {
        (Some(first), Some(second)) => Some(vec![first, second]),
        _ => None,
    }
}

fn operand(spec: &Map<String, Json>) -> Option<&Json> {
    spec.get("filter").or_else(|| spec.get("value"))
}

fn operator<'a>(spec: &'a Map<String, Json>, default: &'a str) -> &'a str {
    spec.get("type").and_then(Json::as_str).unwrap_or(default)
}

fn unsupported(column: &str, filter_type: &'static str, op: &str) -> QueryError {
    QueryError::UnsupportedOperator {
        column: column.to_string(),
        filter_type,
        operator: op.to_string(),
    }
}

fn compile_text(column: &str, spec: &Map<String, Json>) -> Result<TextCondition, QueryError> {
    let op = operator(spec, "contains");
    let text = || -> Result<String, QueryError> {
        match operand(spec) {
            Some(Json::String(s)) => Ok(s.to_lowercase()),
            Some(Json::Number(n)) => Ok(n.to_string()),
            Some(Json::Bool(b)) => Ok(b.to_string()),
            _ => Err(QueryError::MissingOperand {
                column: column.to_string(),
                operand: "filter",
            }),
        }
    };

    Ok(match op {
        "equals" => TextCondition::Equals(text()?),
        "notEqual" => TextCondition::NotEqual(text()?),
        "contains" => TextCondition::Contains(text()?),
        "notContains" => TextCondition::NotContains(text()?),
        "startsWith" => TextCondition::StartsWith(text()?),
        "endsWith" => TextCondition::EndsWith(text()?),
        "blank" => TextCondition::Blank,
        "notBlank" => TextCondition::NotBlank,
        other => return Err(unsupported(column, "text", other)),
    })
}

fn read_number(column: &str, spec: &Map<String, Json>, key: &'static str) -> Result<f64, QueryError> {
    let value = if key == "filter" { operand(spec) } else { spec.get(key) };
    let number = match value {
        Some(Json::Number(n)) => n.as_f64(),
        Some(Json::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.ok_or_else(|| QueryError::MissingOperand {
        column: column.to_string(),
        operand: key,
    })
}

fn compile_number(column: &str, spec: &Map<String, Json>) -> Result<NumberCondition, QueryError> {
    let op = operator(spec, "equals");
    let from = || read_number(column, spec, "filter");

    Ok(match op {
        "equals" => NumberCondition::Equals(from()?),
        "notEqual" => NumberCondition::NotEqual(from()?),
        "lessThan" => NumberCondition::LessThan(from()?),
        "lessThanOrEqual" => NumberCondition::LessThanOrEqual(from()?),
        "greaterThan" => NumberCondition::GreaterThan(from()?),
        "greaterThanOrEqual" => NumberCondition::GreaterThanOrEqual(from()?),
        "inRange" => NumberCondition::InRange(from()?, read_number(column, spec, "filterTo")?),
        "blank" => NumberCondition::Blank,
        "notBlank" => NumberCondition::NotBlank,
        other => return Err(unsupported(column, "number", other)),
    })
}

fn read_date(column: &str, spec: &Map<String, Json>, key: &'static str) -> Result<NaiveDate, QueryError> {
    spec.get(key)
        .and_then(Json::as_str)
        .and_then(parse_date)
        .ok_or_else(|| QueryError::MissingOperand {
            column: column.to_string(),
            operand: key,
        })
}

fn compile_date(column: &str, spec: &Map<String, Json>) -> Result<DateCondition, QueryError> {
    let op = operator(spec, "equals");
    let from = || read_date(column, spec, "dateFrom");

    Ok(match op {
        "equals" => DateCondition::Equals(from()?),
        "notEqual" => DateCondition::NotEqual(from()?),
        "lessThan" => DateCondition::LessThan(from()?),
        "greaterThan" => DateCondition::GreaterThan(from()?),
        "inRange" => DateCondition::InRange(from()?, read_date(column, spec, "dateTo")?),
        "blank" => DateCondition::Blank,
        "notBlank" => DateCondition::NotBlank,
        other => return Err(unsupported(column, "date", other)),
    })
}

fn compile_set(column: &str, spec: &Map<String, Json>) -> Result<Filter, QueryError> {
    let values = spec
        .get("values")
        .and_then(Json::as_array)
        .ok_or_else(|| QueryError::MissingOperand {
            column: column.to_string(),
            operand: "values",
        })?;

    let values = values
        .iter()
        .map(|value| match value {
            Json::Null => None,
            Json::String(s) => Some(s.clone()),
            other => Some(Value::from(other.clone()).to_string()),
        })
        .collect();
    Ok(Filter::Set(values))
}

// =============================================================================
// Matching
// =============================================================================

fn text_matches(condition: &TextCondition, value: &Value) -> bool {
    let blank = value.is_blank();
    let cell = value.to_string().to_lowercase();

    match condition {
        TextCondition::Equals(s) => !blank && cell == *s,
        TextCondition::NotEqual(s) => blank || cell != *s,
        TextCondition::Contains(s) => !blank && cell.contains(s.as_str()),
        TextCondition::NotContains(s) => blank || !cell.contains(s.as_str()),
        TextCondition::StartsWith(s) => !blank && cell.starts_with(s.as_str()),
        TextCondition::EndsWith(s) => !blank && cell.ends_with(s.as_str()),
        TextCondition::Blank => blank,
        TextCondition::NotBlank => !blank,
    }
}

fn number_matches(condition: &NumberCondition, value: &Value) -> bool {
    let cell = match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let Some(n) = cell else {
        return matches!(condition, NumberCondition::Blank);
    };

    match condition {
        NumberCondition::Equals(x) => n == *x,
        NumberCondition::NotEqual(x) => n != *x,
        NumberCondition::LessThan(x) => n < *x,
        NumberCondition::LessThanOrEqual(x) => n <= *x,
        NumberCondition::GreaterThan(x) => n > *x,
        NumberCondition::GreaterThanOrEqual(x) => n >= *x,
        NumberCondition::InRange(from, to) => *from <= n && n <= *to,
        NumberCondition::Blank => false,
        NumberCondition::NotBlank => true,
    }
}

fn date_matches(condition: &DateCondition, value: &Value) -> bool {
    let Some(date) = value.as_str().and_then(parse_date) else {
        return matches!(condition, DateCondition::Blank);
    };

    match condition {
        DateCondition::Equals(d) => date == *d,
        DateCondition::NotEqual(d) => date != *d,
        DateCondition::LessThan(d) => date < *d,
        DateCondition::GreaterThan(d) => date > *d,
        DateCondition::InRange(from, to) => *from < date && date < *to,
        DateCondition::Blank => false,
        DateCondition::NotBlank => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_contains_is_case_insensitive() {
        let filter = Filter::compile("country", &json!({"filterType": "text", "type": "contains", "filter": "UNITED"})).unwrap();
        assert!(filter.matches(&Value::from("United States")));
        assert!(!filter.matches(&Value::from("Australia")));
        assert!(!filter.matches(&Value::Null));
    }

    #[test]
    fn test_inferred_text_equals_with_value_alias() {
        let filter = Filter::compile("country", &json!({"type": "equals", "value": "USA"})).unwrap();
        assert_eq!(filter, Filter::Text(TextCondition::Equals("usa".into())));
        assert!(filter.matches(&Value::from("USA")));
    }

    #[test]
    fn test_inferred_number_filter() {
        let filter = Filter::compile("age", &json!({"type": "greaterThan", "filter": 30})).unwrap();
        assert!(filter.matches(&Value::from(31)));
        assert!(!filter.matches(&Value::from(30)));
        assert!(!filter.matches(&Value::Null));
    }

    #[test]
    fn test_number_in_range_is_inclusive() {
        let filter = Filter::compile(
            "age",
            &json!({"filterType": "number", "type": "inRange", "filter": 20, "filterTo": 24}),
        )
        .unwrap();
        assert!(filter.matches(&Value::from(20)));
        assert!(filter.matches(&Value::from(24)));
        assert!(!filter.matches(&Value::from(25)));
    }

    #[test]
    fn test_in_range_requires_upper_bound() {
        let err = Filter::compile("age", &json!({"filterType": "number", "type": "inRange", "filter": 20})).unwrap_err();
        assert_eq!(
            err,
            QueryError::MissingOperand {
                column: "age".into(),
                operand: "filterTo"
            }
        );
    }

    #[test]
    fn test_set_filter() {
        let filter = Filter::compile("year", &json!({"filterType": "set", "values": ["2008", null]})).unwrap();
        assert!(filter.matches(&Value::from(2008)));
        assert!(filter.matches(&Value::Null));
        assert!(!filter.matches(&Value::from(2004)));
    }

    #[test]
    fn test_date_filter() {
        let filter = Filter::compile(
            "date",
            &json!({"filterType": "date", "type": "lessThan", "dateFrom": "2004-01-01 00:00:00"}),
        )
        .unwrap();
        assert!(filter.matches(&Value::from("29/08/2000")));
        assert!(!filter.matches(&Value::from("24/08/2008")));
    }

    #[test]
    fn test_combined_filter_inherits_type() {
        let filter = Filter::compile(
            "athlete",
            &json!({
                "filterType": "text",
                "operator": "OR",
                "conditions": [
                    {"type": "startsWith", "filter": "michael"},
                    {"type": "endsWith", "filter": "thorpe"}
                ]
            }),
        )
        .unwrap();
        assert!(filter.matches(&Value::from("Michael Phelps")));
        assert!(filter.matches(&Value::from("Ian Thorpe")));
        assert!(!filter.matches(&Value::from("Natalie Coughlin")));
    }

    #[test]
    fn test_untyped_combined_filter_infers_per_condition() {
        let filter = Filter::compile(
            "age",
            &json!({
                "operator": "AND",
                "conditions": [
                    {"type": "greaterThan", "filter": 20},
                    {"type": "lessThan", "filter": 30}
                ]
            }),
        )
        .unwrap();
        assert!(filter.matches(&Value::from(24)));
        assert!(!filter.matches(&Value::from(31)));
        assert!(!filter.matches(&Value::from(17)));
    }

    #[test]
    fn test_legacy_two_condition_filter() {
        let filter = Filter::compile(
            "age",
            &json!({
                "filterType": "number",
                "operator": "AND",
                "condition1": {"type": "greaterThan", "filter": 20},
                "condition2": {"type": "lessThan", "filter": 25}
            }),
        )
        .unwrap();
        assert!(filter.matches(&Value::from(22)));
        assert!(!filter.matches(&Value::from(26)));
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let err = Filter::compile("age", &json!({"filterType": "number", "type": "roughly", "filter": 1})).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_non_object_spec_is_rejected() {
        let err = Filter::compile("age", &json!(24)).unwrap_err();
        assert!(matches!(err, QueryError::MalformedFilter { .. }));
    }

    #[test]
    fn test_filter_model_matches_all_columns() {
        let raw: HashMap<String, Json> = serde_json::from_value(json!({
            "country": {"type": "equals", "filter": "USA"},
            "age": {"type": "lessThan", "filter": 25}
        }))
        .unwrap();
        let model = FilterModel::compile(&raw).unwrap();

        let young = Row::new(crate::model::RowId::Leaf(1)).set("country", "USA").set("age", 23);
        let old = Row::new(crate::model::RowId::Leaf(2)).set("country", "USA").set("age", 30);
        assert!(model.matches(&young));
        assert!(!model.matches(&old));
    }
}
