// src/engine/aggregate.rs
use std::{cmp::Ordering, collections::HashMap};

use super::value::{Record, ReportRow, Value};

/// Summary functions available to a group-by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Max,
    Count,
}

/// `reducer(field) AS output`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub output: String,
    pub field: String,
    pub reducer: Reducer,
}

impl Aggregation {
    pub fn new(output: impl Into<String>, field: impl Into<String>, reducer: Reducer) -> Self {
        Self {
            output: output.into(),
            field: field.into(),
            reducer,
        }
    }

    pub fn sum(output: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(output, field, Reducer::Sum)
    }

    pub fn max(output: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(output, field, Reducer::Max)
    }

    pub fn count(output: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(output, field, Reducer::Count)
    }
}

/// Running state of one aggregation within one group.
#[derive(Debug, Clone)]
enum Accumulator {
    Sum(Option<Value>),
    Max(Option<Value>),
    Count(i64),
}

impl Accumulator {
    fn new(reducer: Reducer) -> Self {
        match reducer {
            Reducer::Sum => Accumulator::Sum(None),
            Reducer::Max => Accumulator::Max(None),
            Reducer::Count => Accumulator::Count(0),
        }
    }

    /// Nulls are skipped by every reducer.
    fn feed(&mut self, value: Value) {
        if value.is_null() {
            return;
        }
        match self {
            Accumulator::Sum(acc) => {
                *acc = match acc.take() {
                    None => value.as_f64().map(|_| value),
                    Some(prev) => prev.add(&value).or(Some(prev)),
                };
            }
            Accumulator::Max(acc) => {
                let replace = acc
                    .as_ref()
                    .map_or(true, |cur| value.compare(cur) == Ordering::Greater);
                if replace {
                    *acc = Some(value);
                }
            }
            Accumulator::Count(n) => *n += 1,
        }
    }

    fn finish(self) -> Value {
        match self {
            Accumulator::Sum(v) | Accumulator::Max(v) => v.unwrap_or(Value::Null),
            Accumulator::Count(n) => Value::Int(n),
        }
    }
}

/// Group `rows` by `group_keys` and reduce each group.
///
/// Each output row holds the group key columns (in key order) followed by
/// one column per aggregation. Groups come out in order of first
/// appearance; use [`order_by`] for a defined order. An empty input gives
/// an empty output, even with no group keys.
pub fn aggregate<R: Record>(
    rows: &[R],
    group_keys: &[&str],
    aggregations: &[Aggregation],
) -> Vec<ReportRow> {
    let mut slots: HashMap<Vec<Value>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<Value>, Vec<Accumulator>)> = Vec::new();

    for row in rows {
        let key: Vec<Value> = group_keys.iter().map(|k| row.field(k)).collect();
        let idx = match slots.get(&key) {
            Some(&idx) => idx,
            None => {
                let accs = aggregations
                    .iter()
                    .map(|a| Accumulator::new(a.reducer))
                    .collect();
                groups.push((key.clone(), accs));
                slots.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        let (_, accs) = &mut groups[idx];
        for (acc, agg) in accs.iter_mut().zip(aggregations) {
            acc.feed(row.field(&agg.field));
        }
    }

    groups
        .into_iter()
        .map(|(key, accs)| {
            let mut out = ReportRow::new();
            for (name, value) in group_keys.iter().zip(key) {
                out.set(*name, value);
            }
            for (agg, acc) in aggregations.iter().zip(accs) {
                out.set(agg.output.as_str(), acc.finish());
            }
            out
        })
        .collect()
}

/// One entry of an ORDER BY list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Stable sort by an explicit key list. Nulls sort first ascending and
/// last descending.
pub fn order_by(rows: &mut [ReportRow], keys: &[SortKey]) {
    rows.sort_by(|a, b| {
        for key in keys {
            let (x, y) = (a.field(&key.column), b.field(&key.column));
            let ord = x.compare(&y);
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}
