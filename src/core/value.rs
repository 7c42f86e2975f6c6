use std::fmt;

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, ValueRef};
use serde_json::Value as JsonValue;

/// Scalar SQL value as SQLite stores and compares it.
///
/// This is what a JSON value turns into when it is handed to the engine as a
/// bound parameter: booleans become `1`/`0`, numbers keep their integer or
/// real affinity, and containers travel as their compact JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Boolean(_) => "BOOLEAN",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Native SQLite representation of a JSON value.
    ///
    /// Mirrors what `json_extract` returns for the same JSON value, so that
    /// comparing the two with `=` behaves like comparing the JSON values.
    ///
    /// Integers outside the `i64` range become REAL, as they do inside
    /// SQLite's JSON1, and lose precision beyond 2^53 on both sides of a
    /// comparison: `18446744073709551615` and `18446744073709551614` compare
    /// equal. Store such numbers as JSON strings to compare them exactly.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    // u64 above i64::MAX and all fractional numbers
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Value::Text(value.to_string()),
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        Value::from_json(value)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Float(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Boolean(b) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*b))),
        })
    }
}

/// Renders the value as an SQL literal
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "'{}'", sql_escape_string(s)),
            Value::Boolean(b) => write!(f, "{}", i64::from(*b)),
        }
    }
}

/// Escapes a string for inclusion in a SQL literal.
///
/// Replaces single quotes with double single quotes.
pub fn sql_escape_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Quotes an SQL identifier, doubling embedded double quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!(true)), Value::Boolean(true));
        assert_eq!(Value::from_json(&json!(42)), Value::Integer(42));
        assert_eq!(Value::from_json(&json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from_json(&json!("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_from_json_large_unsigned_is_real() {
        assert_eq!(Value::from_json(&json!(i64::MAX)), Value::Integer(i64::MAX));
        assert_eq!(
            Value::from_json(&json!(u64::MAX)),
            Value::Float(18446744073709551615u64 as f64)
        );
        assert_eq!(
            Value::from_json(&json!(u64::MAX - 1)),
            Value::from_json(&json!(u64::MAX))
        );
    }

    #[test]
    fn test_from_json_containers_become_compact_text() {
        assert_eq!(
            Value::from_json(&json!({"a": [1, 2]})),
            Value::Text(r#"{"a":[1,2]}"#.into())
        );
    }

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Value::Text("it's".into()).to_string(), "'it''s'");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Boolean(false).to_string(), "0");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("data"), "\"data\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
