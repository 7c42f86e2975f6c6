//! JSON Field Module
//!
//! Stores structured values as JSON text in SQLite columns and builds
//! JSON1 queries and indexes over them.
//!
//! # Architecture
//!
//! - `codec.rs` - backend selection and the encode/decode pair
//! - `config.rs` - per-field configuration
//! - `column.rs` - write-side and read-side column representations
//! - `field.rs` - the field adapter (JsonField)
//! - `index.rs` - expression indexes over JSON paths
//! - `validator.rs` - strict validation of untrusted input
//! - `error.rs` - domain-specific errors

mod codec;
mod column;
mod config;
mod error;
mod field;
mod index;
mod validator;

pub use codec::{Backend, Codec, select_backend};
pub use column::{ColumnText, EMPTY_OBJECT, FieldValue, RawColumn};
pub use config::{DecodeFn, EncodeFn, FieldConfig};
pub use error::{JsonError, JsonResult};
pub use field::{JsonField, StoredJson};
pub use index::{
    IndexOptions, JsonIndex, create_index_sql, create_json_index, default_index_name,
    safe_path_suffix,
};
pub use validator::{StrictDocument, UntypedInput, validate_document};
