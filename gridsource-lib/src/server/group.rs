//! Row grouping and aggregation.

use std::collections::HashMap;

use crate::model::CHILD_COUNT_FIELD;
use crate::model::Row;
use crate::model::RowId;
use crate::model::Value;
use crate::query::AggFunc;
use crate::query::ColumnVo;

/// Collapses `rows` into one group row per distinct value of `column`.
///
/// Groups appear in first-seen order. Each group row carries the group value
/// under the column's field, the number of leaf rows under it, and the
/// aggregated value columns.
pub(super) fn group_rows(
    rows: &[&Row],
    column: &ColumnVo,
    parent_keys: &[String],
    value_cols: &[ColumnVo],
) -> Vec<Row> {
    let mut groups: Vec<(String, Vec<&Row>)> = Vec::new();
    // Key to position in `groups`, which keeps first-seen order.
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = row.value(&column.field).to_string();
        match index.get(&key) {
            Some(&position) => groups[position].1.push(*row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![*row]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let mut path = parent_keys.to_vec();
            path.push(key);

            let group = Row::new(RowId::Group(path))
                .set(column.field.clone(), members[0].value(&column.field).clone())
                .set(CHILD_COUNT_FIELD, members.len() as u64);

            value_cols.iter().fold(group, |group, value_col| {
                let agg_func = value_col.agg_func.unwrap_or(AggFunc::Sum);
                group.set(value_col.field.clone(), aggregate(&members, &value_col.field, agg_func))
            })
        })
        .collect()
}

/// Aggregates one field over the rows of a group.
///
/// Numeric aggregations skip non-numeric cells and yield null when no cell
/// is numeric.
fn aggregate(rows: &[&Row], field: &str, agg_func: AggFunc) -> Value {
    let numbers = || rows.iter().filter_map(|row| row.value(field).as_f64());

    match agg_func {
        AggFunc::Count => Value::from(rows.len() as u64),
        AggFunc::First => rows.first().map(|r| r.value(field).clone()).unwrap_or_default(),
        AggFunc::Last => rows.last().map(|r| r.value(field).clone()).unwrap_or_default(),
        AggFunc::Sum => numbers().reduce(|a, b| a + b).into(),
        AggFunc::Min => numbers().reduce(f64::min).into(),
        AggFunc::Max => numbers().reduce(f64::max).into(),
        AggFunc::Avg => {
            let (sum, count) = numbers().fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
            (count > 0).then(|| sum / count as f64).into()
        }
    }
}
