//! JSON field
//!
//! Converts between structured values and the text stored in an SQLite
//! column, and builds JSON1 query expressions over that column.
//!
//! Reads are total: whatever the column holds, [`JsonField::from_column`]
//! returns a value, degrading to an empty object when the content cannot be
//! decoded. Schema-time helpers fail loudly instead.

use super::codec::Codec;
use super::column::{ColumnText, EMPTY_OBJECT, FieldValue, RawColumn};
use super::config::FieldConfig;
use super::error::{JsonError, JsonResult};
use crate::connection::json1_available;
use crate::expression::{Expr, json_ops};
use log::debug;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Row, ToSql};
use serde_json::{Map, Value as JsonValue};

/// Text column holding JSON
#[derive(Debug, Clone)]
pub struct JsonField {
    name: String,
    column_name: Option<String>,
    config: FieldConfig,
    codec: Codec,
}

impl JsonField {
    /// Field with the default configuration and backend
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, FieldConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: FieldConfig) -> Self {
        Self {
            name: name.into(),
            column_name: None,
            config,
            codec: Codec::default_codec(),
        }
    }

    /// Store under a column name different from the field name
    pub fn column_name(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }

    /// Use a specific backend instead of the process-wide selection
    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column the field is stored in
    pub fn column(&self) -> &str {
        self.column_name.as_deref().unwrap_or(&self.name)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Fresh empty object, for use as a column default
    pub fn default_value(&self) -> JsonValue {
        JsonValue::Object(Map::new())
    }

    /// Text to store for `value`.
    ///
    /// Only a failing custom encoder produces an error.
    pub fn to_column(&self, value: impl Into<FieldValue>) -> JsonResult<ColumnText> {
        match value.into() {
            FieldValue::Encoded(text) => Ok(ColumnText::Text(text)),
            FieldValue::Json(value) if !value.is_null() => {
                let text = match &self.config.encoder {
                    Some(encode) => encode(&value)?,
                    None => self.codec.encode(&value, self.config.ensure_ascii)?,
                };
                Ok(ColumnText::Text(text))
            }
            _ if self.config.null_to_empty => Ok(ColumnText::Text(EMPTY_OBJECT.to_string())),
            _ => Ok(ColumnText::Null),
        }
    }

    /// Value for whatever the column returned. Never fails.
    pub fn from_column<'a>(&self, raw: impl Into<RawColumn<'a>>) -> JsonValue {
        match raw.into() {
            RawColumn::Null => self.default_value(),
            RawColumn::Decoded(value) => value,
            RawColumn::Bytes(bytes) => self.decode_or_empty(&String::from_utf8_lossy(bytes)),
            RawColumn::Text(text) => self.decode_or_empty(text),
            RawColumn::Other(kind) => {
                debug!("field '{}': {} in column, using empty object", self.name, kind);
                self.default_value()
            }
        }
    }

    pub fn from_value_ref(&self, value: ValueRef<'_>) -> JsonValue {
        self.from_column(value)
    }

    /// Read this field from column `idx` of a result row.
    ///
    /// Only an out-of-range index fails, so this fits directly in a
    /// `query_row`/`query_map` closure.
    pub fn read(&self, row: &Row<'_>, idx: usize) -> rusqlite::Result<JsonValue> {
        let value = row.get_ref(idx)?;
        Ok(self.from_value_ref(value))
    }

    fn decode_or_empty(&self, text: &str) -> JsonValue {
        let decoded = match &self.config.decoder {
            Some(decode) => decode(text),
            None => self.codec.decode(text),
        };
        decoded.unwrap_or_else(|err| {
            debug!("field '{}': undecodable column, using empty object: {}", self.name, err);
            self.default_value()
        })
    }

    /// `json_valid("<column>")`, for a CHECK constraint.
    ///
    /// Fails when the linked SQLite has no JSON1.
    pub fn check_valid(&self) -> JsonResult<String> {
        Ok(self.valid_expr()?.to_string())
    }

    /// Same as [`check_valid`](Self::check_valid), as an expression node
    pub fn valid_expr(&self) -> JsonResult<Expr> {
        if !json1_available() {
            return Err(JsonError::Json1Unavailable);
        }
        Ok(json_ops::json_valid(self.column_expr()))
    }

    pub fn column_expr(&self) -> Expr {
        Expr::col(self.column())
    }

    /// Value at `path` as JSON text; see [`json_ops::extract`]
    pub fn extract(&self, path: &str) -> Expr {
        json_ops::extract(self.column_expr(), path)
    }

    /// Raw SQL value at `path`
    pub fn extract_raw(&self, path: &str) -> Expr {
        json_ops::extract_raw(self.column_expr(), path)
    }

    pub fn contains_key(&self, path: &str) -> Expr {
        json_ops::contains_key(self.column_expr(), path)
    }

    pub fn path_eq(&self, path: &str, value: &JsonValue) -> Expr {
        json_ops::path_eq(self.column_expr(), path, value)
    }

    /// New column value with `path` set to `value`, for UPDATE
    pub fn set_at(&self, path: &str, value: &JsonValue) -> Expr {
        json_ops::set_at(self.column_expr(), path, value)
    }
}

/// JSON value read and written with the default field policy.
///
/// Reading never fails: NULL and malformed content become `{}`. A JSON
/// `null` is written as `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredJson(pub JsonValue);

impl StoredJson {
    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl FromSql for StoredJson {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(StoredJson(JsonField::new("").from_value_ref(value)))
    }
}

impl ToSql for StoredJson {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = JsonField::new("")
            .to_column(&self.0)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::Owned(match text {
            ColumnText::Null => SqlValue::Null,
            ColumnText::Text(text) => SqlValue::Text(text),
        }))
    }
}
