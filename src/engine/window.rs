// src/engine/window.rs
use std::collections::HashMap;

use super::value::{Record, Value};

/// One position of a running sum.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningTotal {
    pub partition: Value,
    pub order: Value,
    pub cumulative: Value,
    /// Index of the source row in the input slice.
    pub row: usize,
}

/// `SUM(value_field) OVER (PARTITION BY partition_by ORDER BY order_by)`
/// with a ROWS frame ending at the current row.
///
/// Partitions are emitted in order of first appearance, each sorted by
/// `order_by` with ties kept in input order. A null value adds nothing but
/// the total carries on; it is never reset or skipped.
pub fn running_sum<R: Record>(
    rows: &[R],
    partition_by: &str,
    order_by: &str,
    value_field: &str,
) -> Vec<RunningTotal> {
    // 1) bucket row indexes by partition, first-seen order
    let mut slots: HashMap<Value, usize> = HashMap::new();
    let mut partitions: Vec<(Value, Vec<(Value, usize)>)> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let key = row.field(partition_by);
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            partitions.push((key, Vec::new()));
            partitions.len() - 1
        });
        partitions[slot].1.push((row.field(order_by), idx));
    }

    // 2) stable sort each partition and accumulate
    let mut out = Vec::with_capacity(rows.len());
    for (partition, mut members) in partitions {
        members.sort_by(|a, b| a.0.compare(&b.0));

        let mut total = Value::Int(0);
        for (order, idx) in members {
            let value = rows[idx].field(value_field);
            if !value.is_null() {
                if let Some(next) = total.add(&value) {
                    total = next;
                }
            }
            out.push(RunningTotal {
                partition: partition.clone(),
                order,
                cumulative: total.clone(),
                row: idx,
            });
        }
    }
    out
}
