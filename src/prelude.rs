//! Common imports for application code.
//!
//! ```
//! use sqlite_jsonfield::prelude::*;
//!
//! let field = JsonField::new("data");
//! assert_eq!(field.contains_key("$.a").to_sql().params.len(), 0);
//! ```

pub use crate::connection::{Database, SqlHandle};
pub use crate::expression::{Expr, SqlFragment};
pub use crate::json::{
    FieldConfig, FieldValue, IndexOptions, JsonError, JsonField, JsonResult, StoredJson,
    create_json_index,
};
