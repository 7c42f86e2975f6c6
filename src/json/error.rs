//! JSON field error types
//!
//! Only schema-time operations and strict validation ever surface these;
//! reading a stored column never fails.

use crate::core::DbError;
use thiserror::Error;

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("SQLite is built without JSON1 support")]
    Json1Unavailable,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Unexpected input: {0}")]
    UnexpectedInput(String),

    #[error("JSON encode error: {0}")]
    EncodeError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbError),
}

impl From<serde_json::Error> for JsonError {
    fn from(err: serde_json::Error) -> Self {
        JsonError::InvalidJson(err.to_string())
    }
}

impl From<rusqlite::Error> for JsonError {
    fn from(err: rusqlite::Error) -> Self {
        JsonError::DatabaseError(DbError::Sqlite(err))
    }
}
