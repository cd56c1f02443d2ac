//! Cell and parameter values.
//!
//! SQLite stores every value in one of five storage classes. `Value` mirrors
//! those classes and adds `Bool`, which callers may bind as a parameter even
//! though the engine stores it as an integer. Values read back from the engine
//! never carry `Bool`.

use std::fmt;

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Serialize, Serializer};

/// A single typed value, used both for bound parameters and result cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Bytes(Vec<u8>),
}

/// Column type, inferred from the first non-null value a column produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// No non-null value was seen.
    #[default]
    Null,
    Bool,
    Integer,
    Real,
    Text,
    Blob,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Null => ColumnType::Null,
            Value::Bool(_) => ColumnType::Bool,
            Value::Integer(_) => ColumnType::Integer,
            Value::Real(_) => ColumnType::Real,
            Value::Text(_) => ColumnType::Text,
            Value::Bytes(_) => ColumnType::Blob,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}

/// Text rendering used by the record bridges: null renders empty and blobs
/// render as lowercase hex.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&hex::encode(b)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(r) => serializer.serialize_f64(*r),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&hex::encode(b)),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(b) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(i64::from(*b))),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Bytes(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

/// Copies a cell out of the engine. TEXT cells holding invalid UTF-8 are
/// decoded lossily, with bad sequences replaced by U+FFFD.
impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Null, "")]
    #[case(Value::Bool(true), "true")]
    #[case(Value::Integer(10), "10")]
    #[case(Value::Real(1.5), "1.5")]
    #[case(Value::Text("A".into()), "A")]
    #[case(Value::Bytes(vec![0x00, 0xff]), "00ff")]
    fn test_display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[rstest]
    fn test_column_type() {
        assert_eq!(Value::Null.column_type(), ColumnType::Null);
        assert_eq!(Value::Integer(1).column_type(), ColumnType::Integer);
        assert_eq!(Value::Bytes(vec![]).column_type(), ColumnType::Blob);
    }

    #[rstest]
    fn test_from_value_ref_text_is_lossy() {
        let value = Value::from(ValueRef::Text(&[0x41, 0xff]));
        assert_eq!(value, Value::Text("A\u{fffd}".to_string()));
    }

    #[rstest]
    #[case(Value::Integer(7), Some(7))]
    #[case(Value::Bool(true), Some(1))]
    #[case(Value::Text("7".into()), None)]
    #[case(Value::Null, None)]
    fn test_as_i64(#[case] value: Value, #[case] expected: Option<i64>) {
        assert_eq!(value.as_i64(), expected);
    }

    #[rstest]
    fn test_as_str() {
        assert_eq!(Value::Text("A".into()).as_str(), Some("A"));
        assert_eq!(Value::Integer(1).as_str(), None);
    }

    #[rstest]
    fn test_bool_binds_as_integer() {
        let output = Value::Bool(true).to_sql().unwrap();
        assert_eq!(output, ToSqlOutput::Owned(rusqlite::types::Value::Integer(1)));
    }

    #[rstest]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[rstest]
    fn test_serialize_json() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Integer(3),
            Value::Text("a".into()),
            Value::Bytes(vec![1]),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,3,"a","01"]"#);
    }
}
