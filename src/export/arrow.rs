// src/export/arrow.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::Datelike;
use std::sync::Arc;

use crate::engine::{ReportRow, Value};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Column names across all rows, in first-seen order.
pub fn column_names(rows: &[ReportRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        for name in row.names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Pick an Arrow type for a column from its non-null values.
///
/// - only Int              → Int64
/// - Int and/or Float      → Float64
/// - only Date             → Date32
/// - text, mixes, all-null → Utf8
pub fn infer_data_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> DataType {
    let mut current: Option<DataType> = None;
    for value in values {
        let ty = match value {
            Value::Null => continue,
            Value::Int(_) => DataType::Int64,
            Value::Float(_) => DataType::Float64,
            Value::Text(_) => DataType::Utf8,
            Value::Date(_) => DataType::Date32,
        };
        current = Some(match (current, ty) {
            (None, ty) => ty,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64), DataType::Float64) | (Some(DataType::Float64), DataType::Int64) => {
                DataType::Float64
            }
            _ => return DataType::Utf8,
        });
    }
    current.unwrap_or(DataType::Utf8)
}

/// Build the Arrow schema for a set of report rows. Every field is nullable.
pub fn build_arrow_schema(rows: &[ReportRow]) -> Arc<Schema> {
    let fields: Vec<Field> = column_names(rows)
        .iter()
        .map(|name| {
            let dt = infer_data_type(rows.iter().filter_map(|r| r.get(name)));
            Field::new(name, dt, true)
        })
        .collect();
    Arc::new(Schema::new(fields))
}

fn build_column(rows: &[ReportRow], name: &str, dt: &DataType) -> ArrayRef {
    let cells = || rows.iter().map(move |r| r.get(name));
    match dt {
        DataType::Int64 => Arc::new(Int64Array::from(
            cells().map(|v| v.and_then(Value::as_i64)).collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            cells().map(|v| v.and_then(Value::as_f64)).collect::<Vec<_>>(),
        )),
        DataType::Date32 => Arc::new(Date32Array::from(
            cells()
                .map(|v| {
                    v.and_then(Value::as_date)
                        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
                })
                .collect::<Vec<_>>(),
        )),
        _ => Arc::new(StringArray::from(
            cells()
                .map(|v| v.filter(|v| !v.is_null()).map(|v| v.to_string()))
                .collect::<Vec<Option<String>>>(),
        )),
    }
}

/// Convert report rows into one in-memory Arrow table.
pub fn to_record_batch(rows: &[ReportRow]) -> Result<RecordBatch> {
    let schema = build_arrow_schema(rows);
    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|f| build_column(rows, f.name(), f.data_type()))
        .collect();
    RecordBatch::try_new(schema, columns).context("building report record batch")
}
