//! Expression indexes over JSON paths

use super::error::{JsonError, JsonResult};
use super::field::JsonField;
use crate::connection::{CapabilityProbe, SqlHandle};
use crate::core::quote_ident;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;

lazy_static! {
    static ref PATH_SEPARATORS: Regex = Regex::new(r"[.\[]").unwrap();
}

/// Options for [`create_json_index`]
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub unique: bool,
    pub name: Option<String>,
}

impl IndexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Handle to an index created by [`create_json_index`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonIndex {
    pub name: String,
}

/// Path reduced to identifier characters: `$.a.b[0]` becomes `_a_b_0`
pub fn safe_path_suffix(path: &str) -> String {
    let trimmed = path.trim_start_matches('$');
    PATH_SEPARATORS.replace_all(trimmed, "_").replace(']', "")
}

/// Format: `<table>_<field>_<safe path>_idx`
pub fn default_index_name(table: &str, field_name: &str, path: &str) -> String {
    format!("{}_{}_{}_idx", table, field_name, safe_path_suffix(path))
}

/// `CREATE [UNIQUE] INDEX IF NOT EXISTS` statement for a JSON path
pub fn create_index_sql(
    table: &str,
    field: &JsonField,
    path: &str,
    unique: bool,
    name: &str,
) -> String {
    format!(
        "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
        if unique { "UNIQUE " } else { "" },
        quote_ident(name),
        quote_ident(table),
        field.extract_raw(path)
    )
}

/// Create an expression index on `json_extract(<column>, <path>)`.
///
/// The indexed expression is the one [`JsonField::path_eq`] and
/// [`JsonField::extract_raw`] produce, so queries built with them can use it.
/// Running it again with the same arguments is a no-op. DDL errors are
/// returned unchanged.
pub fn create_json_index(
    db: &dyn SqlHandle,
    table: &str,
    field: &JsonField,
    path: &str,
    options: IndexOptions,
) -> JsonResult<JsonIndex> {
    if !CapabilityProbe::global().probe(db) {
        return Err(JsonError::Json1Unavailable);
    }

    let name = options
        .name
        .unwrap_or_else(|| default_index_name(table, field.name(), path));
    let sql = create_index_sql(table, field, path, options.unique, &name);

    db.execute_sql(&sql)?;
    info!("ensured JSON index {} on {}({}) via {}", name, table, path, db.handle_id());

    Ok(JsonIndex { name })
}
