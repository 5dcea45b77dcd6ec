//! Result-set reshaping.
//!
//! The query source returns positional rows plus column metadata. This
//! module rebuilds the typed response shape: one object per row keyed by
//! column name, with date and date-time columns re-rendered as ISO-8601
//! strings in UTC. Everything else passes through unchanged.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column metadata as declared by the query source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

/// The reshaped response: named rows plus the column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub data: Vec<Map<String, Value>>,
    pub meta: Vec<ColumnMeta>,
}

/// Reshape positional rows into named rows, normalizing temporal columns.
pub fn reshape(rows: Vec<Vec<Value>>, meta: Vec<ColumnMeta>) -> QueryResult {
    let data = rows
        .into_iter()
        .map(|row| {
            meta.iter()
                .zip(row)
                .map(|(col, cell)| (col.name.clone(), normalize_cell(&col.column_type, cell)))
                .collect()
        })
        .collect();

    QueryResult { data, meta }
}

fn normalize_cell(column_type: &str, cell: Value) -> Value {
    match column_type {
        "DateTime" => rewrite_string_cell(cell, datetime_to_iso_utc),
        "Date" => rewrite_string_cell(cell, date_to_iso_utc),
        _ => cell,
    }
}

/// Apply `f` to a string cell; anything unparseable passes through rather
/// than failing the whole response.
fn rewrite_string_cell(cell: Value, f: impl Fn(&str) -> Option<String>) -> Value {
    match &cell {
        Value::String(s) => match f(s) {
            Some(rewritten) => Value::String(rewritten),
            None => cell,
        },
        _ => cell,
    }
}

fn datetime_to_iso_utc(raw: &str) -> Option<String> {
    // the store's native text format, or ISO-8601 without offset
    let dt = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    Some(format!("{}+00:00", dt.format("%Y-%m-%dT%H:%M:%S")))
}

fn date_to_iso_utc(raw: &str) -> Option<String> {
    let d = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(format!("{}T00:00:00+00:00", d.format("%Y-%m-%d")))
}
