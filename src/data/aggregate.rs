use std::collections::BTreeMap;
use std::fmt;

use super::error::InvalidColumnError;
use super::model::{Column, Table, Value};

/// How the values of one group collapse to a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reducer::Sum => f.write_str("sum"),
            Reducer::Mean => f.write_str("mean"),
        }
    }
}

/// One `(category, reduced value)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRow {
    pub key: Value,
    pub value: f64,
}

/// Group `table` by `group_col` and reduce `value_col` per group.
///
/// Column names are parsed first; unknown names and a non-numeric value
/// column are rejected without touching the table.
pub fn aggregate(
    table: &Table,
    group_col: &str,
    value_col: &str,
    reducer: Reducer,
) -> Result<Vec<AggregateRow>, InvalidColumnError> {
    let group: Column = group_col.parse()?;
    let value: Column = value_col.parse()?;
    aggregate_by(table, group, value, reducer)
}

/// Typed variant of [`aggregate`].
///
/// Rows come out in ascending key order, one per distinct key present in
/// the table. An empty table gives an empty result.
pub fn aggregate_by(
    table: &Table,
    group: Column,
    value: Column,
    reducer: Reducer,
) -> Result<Vec<AggregateRow>, InvalidColumnError> {
    if !value.is_numeric() {
        return Err(InvalidColumnError::NotNumeric(value));
    }

    let groups: BTreeMap<Value, (f64, usize)> =
        table.iter().fold(BTreeMap::new(), |mut acc, rec| {
            let x = rec.number(value).unwrap_or(f64::NAN);
            let slot = acc.entry(rec.value(group)).or_insert((0.0, 0));
            slot.0 += x;
            slot.1 += 1;
            acc
        });

    Ok(groups
        .into_iter()
        .map(|(key, (sum, count))| AggregateRow {
            key,
            value: match reducer {
                Reducer::Sum => sum,
                Reducer::Mean => sum / count as f64,
            },
        })
        .collect())
}
