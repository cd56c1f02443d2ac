//! Table to flat JSON record conversion.
//!
//! Every cell becomes its text rendering, so the conversion is lossy: an
//! integer column comes back as strings. Serialize and deserialize failures
//! degrade to an empty string or `None` instead of propagating.

use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::db::{Param, Table, Value};

/// One row as an ordered map of column name to text.
pub type Record = Map<String, JsonValue>;

/// Convert every row of `table` into a record, in column order.
pub fn table_to_records(table: &Table) -> Vec<Record> {
    table
        .rows()
        .map(|row| {
            row.iter()
                .map(|(name, value)| (name.to_string(), JsonValue::String(value.to_string())))
                .collect()
        })
        .collect()
}

/// Pretty-printed JSON for `record`, or an empty string on failure.
pub fn serialize(record: &Record) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|e| {
        debug!(error = %e, "record serialization failed");
        String::new()
    })
}

/// Parse a JSON object, or `None` when the text is not one.
pub fn deserialize(text: &str) -> Option<Record> {
    match serde_json::from_str(text) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(error = %e, "record deserialization failed");
            None
        }
    }
}

/// Typed value of a JSON token.
///
/// Integers, booleans, strings and byte arrays map to their typed values;
/// floats, objects and null map to `Value::Null`.
pub fn token_value(token: &JsonValue) -> Value {
    match token {
        JsonValue::Number(n) => n.as_i64().map(Value::Integer).unwrap_or(Value::Null),
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// One named parameter per record field, in field order.
pub fn record_to_params(record: &Record) -> Vec<Param> {
    record
        .iter()
        .map(|(name, token)| Param::new(name.as_str(), token_value(token)))
        .collect()
}
