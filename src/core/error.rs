use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl<T> From<std::sync::PoisonError<T>> for DbError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl DbError {
    /// True when SQLite rejected a statement because a function is unknown
    pub fn is_missing_function(&self) -> bool {
        match self {
            DbError::Sqlite(err) => err.to_string().contains("no such function"),
            DbError::ExecutionError(msg) => msg.contains("no such function"),
            DbError::LockError(_) => false,
        }
    }
}
