pub mod error;
pub mod value;

pub use error::{DbError, Result};
pub use value::{Value, quote_ident, sql_escape_string};
