//! Column-side representations of a JSON field

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, ValueRef};
use serde_json::{Number, Value as JsonValue};

/// Marker stored for a null value when `null_to_empty` is set
pub const EMPTY_OBJECT: &str = "{}";

/// What the application hands to the field on write
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    /// Text that is already JSON; stored as is
    Encoded(String),
    Json(JsonValue),
}

impl FieldValue {
    pub fn encoded(text: impl Into<String>) -> Self {
        FieldValue::Encoded(text.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null | FieldValue::Json(JsonValue::Null))
    }
}

impl From<JsonValue> for FieldValue {
    fn from(value: JsonValue) -> Self {
        FieldValue::Json(value)
    }
}

impl From<&JsonValue> for FieldValue {
    fn from(value: &JsonValue) -> Self {
        FieldValue::Json(value.clone())
    }
}

impl From<Option<JsonValue>> for FieldValue {
    fn from(value: Option<JsonValue>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Json)
    }
}

/// Plain text is taken as pre-encoded JSON
impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Encoded(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Encoded(text)
    }
}

/// Text written to the column, or SQL NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnText {
    Null,
    Text(String),
}

impl ColumnText {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnText::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnText::Null => None,
            ColumnText::Text(text) => Some(text),
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            ColumnText::Null => None,
            ColumnText::Text(text) => Some(text),
        }
    }
}

impl ToSql for ColumnText {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            ColumnText::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            ColumnText::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
        })
    }
}

/// Everything a text column can hand back at runtime.
///
/// SQLite stores by value, not by declared type, so a `TEXT` column may still
/// yield integers, reals or blobs.
#[derive(Debug, Clone, PartialEq)]
pub enum RawColumn<'a> {
    Null,
    /// Already a typed value; no decoding needed
    Decoded(JsonValue),
    Bytes(&'a [u8]),
    Text(&'a str),
    /// Nothing JSON can represent; the tag says what it was
    Other(&'static str),
}

impl<'a> From<ValueRef<'a>> for RawColumn<'a> {
    fn from(value: ValueRef<'a>) -> Self {
        match value {
            ValueRef::Null => RawColumn::Null,
            ValueRef::Integer(i) => RawColumn::Decoded(JsonValue::from(i)),
            ValueRef::Real(f) => match Number::from_f64(f) {
                Some(n) => RawColumn::Decoded(JsonValue::Number(n)),
                None => RawColumn::Other("non-finite real"),
            },
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => RawColumn::Text(text),
                Err(_) => RawColumn::Bytes(bytes),
            },
            ValueRef::Blob(bytes) => RawColumn::Bytes(bytes),
        }
    }
}

impl<'a> From<&'a str> for RawColumn<'a> {
    fn from(text: &'a str) -> Self {
        RawColumn::Text(text)
    }
}

impl<'a> From<&'a [u8]> for RawColumn<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        RawColumn::Bytes(bytes)
    }
}

impl<'a> From<Option<&'a str>> for RawColumn<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(RawColumn::Null, RawColumn::Text)
    }
}

impl From<JsonValue> for RawColumn<'_> {
    fn from(value: JsonValue) -> Self {
        RawColumn::Decoded(value)
    }
}
