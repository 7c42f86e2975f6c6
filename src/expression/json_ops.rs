//! JSON1 query builders
//!
//! Paths are inlined as literals so that an expression index over the same
//! `json_extract` call can serve the query. Values are always bound.

use super::ast::Expr;
use crate::core::Value;
use serde_json::Value as JsonValue;

/// `json_extract(column, path)`: the raw extracted SQL value
pub fn extract_raw(column: impl Into<Expr>, path: &str) -> Expr {
    Expr::func("json_extract", vec![column.into(), Expr::lit(path)])
}

/// Value at `path` as JSON text.
///
/// Strings come back quoted (`"Alice"`, not `Alice`), containers as their
/// JSON text, and both an explicit null and a missing path as `null`.
pub fn extract(column: impl Into<Expr>, path: &str) -> Expr {
    extract_raw(column, path).wrap("json_quote")
}

/// `json_valid(column)`
pub fn json_valid(column: impl Into<Expr>) -> Expr {
    column.into().wrap("json_valid")
}

/// `json_type(column, path)`: NULL when the path is absent
pub fn json_type(column: impl Into<Expr>, path: &str) -> Expr {
    Expr::func("json_type", vec![column.into(), Expr::lit(path)])
}

/// True when the column holds valid JSON and `path` is present.
///
/// A key holding JSON `null` counts as present. `json_type` raises on
/// malformed text, so it only runs once `json_valid` has passed.
pub fn contains_key(column: impl Into<Expr>, path: &str) -> Expr {
    let column = column.into();
    Expr::case(
        json_valid(column.clone()),
        json_type(column, path).is_not_null(),
        Expr::lit(0i64),
    )
}

/// `json_extract(column, path) = ?` with `value` bound natively.
///
/// Comparison follows SQLite rules: booleans match `1`/`0`, integers and
/// reals compare numerically, containers compare as compact JSON text and a
/// JSON `null` never matches. Integers beyond the `i64` range compare as
/// rounded reals; see [`Value::from_json`].
pub fn path_eq(column: impl Into<Expr>, path: &str, value: &JsonValue) -> Expr {
    extract_raw(column, path).eq(Expr::param(Value::from_json(value)))
}

/// `json_set(column, path, ?)` for UPDATE assignments.
///
/// Booleans and containers are bound as JSON text wrapped in `json(?)` so
/// they are stored as JSON values rather than integers or strings.
pub fn set_at(column: impl Into<Expr>, path: &str, value: &JsonValue) -> Expr {
    let bound = match value {
        JsonValue::Bool(_) | JsonValue::Array(_) | JsonValue::Object(_) => {
            Expr::param(value.to_string()).wrap("json")
        }
        _ => Expr::param(Value::from_json(value)),
    };
    Expr::func("json_set", vec![column.into(), Expr::lit(path), bound])
}
