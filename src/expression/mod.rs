//! SQL expression nodes and JSON1 query builders
//!
//! - `ast.rs` - composable expression tree rendered to SQL plus parameters
//! - `json_ops.rs` - path extraction, key presence, equality and update builders

mod ast;
pub mod json_ops;

pub use ast::{BinaryOp, Expr, SqlFragment};
pub use json_ops::{contains_key, extract, extract_raw, path_eq, set_at};
