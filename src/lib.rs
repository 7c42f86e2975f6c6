// ============================================================================
// sqlite-jsonfield Library
// ============================================================================

//! JSON column field for SQLite.
//!
//! A [`JsonField`] stores structured values as JSON text in an ordinary
//! column and builds JSON1 expressions (`json_extract`, `json_type`,
//! `json_set`, ...) to query and update them.
//!
//! # Examples
//!
//! ```
//! use sqlite_jsonfield::{Database, IndexOptions, JsonField, create_json_index};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open_in_memory()?;
//! db.connection().execute("CREATE TABLE users (id INTEGER, data TEXT)", [])?;
//!
//! let data = JsonField::new("data");
//! let stored = data.to_column(json!({"name": "Alice", "age": 30}))?;
//! db.connection().execute("INSERT INTO users VALUES (1, ?)", [&stored])?;
//!
//! create_json_index(&db, "users", &data, "$.age", IndexOptions::new())?;
//!
//! let filter = data.path_eq("$.age", &json!(30));
//! let sql = format!("SELECT {} FROM users WHERE {}", data.extract("$.name"), filter);
//! let frag = filter.to_sql();
//! let name: String = db
//!     .connection()
//!     .query_row(&sql, frag.bound_params(), |row| row.get(0))?;
//! assert_eq!(name, "\"Alice\"");
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod core;
pub mod expression;
pub mod json;
pub mod prelude;

pub use connection::{
    CapabilityProbe, Database, HandleId, SqlHandle, json1_available, probe_in_memory,
};
pub use crate::core::{DbError, Result, Value};
pub use expression::{Expr, SqlFragment};
pub use json::{
    ColumnText, FieldConfig, FieldValue, IndexOptions, JsonError, JsonField, JsonIndex,
    JsonResult, RawColumn, StoredJson, StrictDocument, create_json_index, validate_document,
};
