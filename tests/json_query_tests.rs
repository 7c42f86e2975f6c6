use rusqlite::params_from_iter;
use serde_json::{Value as JsonValue, json};
use sqlite_jsonfield::{Database, Expr, JsonField, Value};

fn setup(rows: &[(i64, Option<&str>)]) -> anyhow::Result<Database> {
    let db = Database::open_in_memory()?;
    db.connection()
        .execute("CREATE TABLE docs (id INTEGER PRIMARY KEY, data TEXT)", [])?;
    for (id, data) in rows {
        db.connection()
            .execute("INSERT INTO docs VALUES (?, ?)", rusqlite::params![id, data])?;
    }
    Ok(db)
}

fn matching_ids(db: &Database, filter: &Expr) -> anyhow::Result<Vec<i64>> {
    let frag = filter.to_sql();
    let sql = format!("SELECT id FROM docs WHERE {} ORDER BY id", frag.sql);
    let mut stmt = db.connection().prepare(&sql)?;
    let ids = stmt
        .query_map(frag.bound_params(), |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn select_text(db: &Database, expr: &Expr, id: i64) -> anyhow::Result<Option<String>> {
    let frag = expr.to_sql();
    let sql = format!("SELECT {} FROM docs WHERE id = {}", frag.sql, id);
    let value = db
        .connection()
        .query_row(&sql, frag.bound_params(), |row| row.get(0))?;
    Ok(value)
}

#[test]
fn test_extract_returns_json_text() -> anyhow::Result<()> {
    let db = setup(&[(
        1,
        Some(r#"{"name": "Alice", "age": 30, "obj": {"b": [1, 2]}, "nothing": null}"#),
    )])?;
    let data = JsonField::new("data");

    assert_eq!(select_text(&db, &data.extract("$.name"), 1)?.as_deref(), Some("\"Alice\""));
    assert_eq!(select_text(&db, &data.extract("$.age"), 1)?.as_deref(), Some("30"));
    assert_eq!(
        select_text(&db, &data.extract("$.obj"), 1)?.as_deref(),
        Some(r#"{"b":[1,2]}"#)
    );
    assert_eq!(select_text(&db, &data.extract("$.nothing"), 1)?.as_deref(), Some("null"));

    // Every result decodes as JSON
    let text = select_text(&db, &data.extract("$.name"), 1)?.unwrap();
    let name: JsonValue = serde_json::from_str(&text)?;
    assert_eq!(name, json!("Alice"));

    Ok(())
}

#[test]
fn test_extract_raw_returns_bare_scalar() -> anyhow::Result<()> {
    let db = setup(&[(1, Some(r#"{"name": "Alice"}"#))])?;
    let data = JsonField::new("data");

    assert_eq!(select_text(&db, &data.extract_raw("$.name"), 1)?.as_deref(), Some("Alice"));

    Ok(())
}

#[test]
fn test_contains_key_distinguishes_null_from_absent() -> anyhow::Result<()> {
    let db = setup(&[
        (1, Some(r#"{"a": null}"#)),
        (2, Some("{}")),
        (3, Some("{not json")),
        (4, None),
        (5, Some(r#"{"a": 0}"#)),
        (6, Some(r#"{"b": {"a": 1}}"#)),
    ])?;
    let data = JsonField::new("data");

    assert_eq!(matching_ids(&db, &data.contains_key("$.a"))?, vec![1, 5]);
    assert_eq!(matching_ids(&db, &data.contains_key("$.b.a"))?, vec![6]);

    Ok(())
}

#[test]
fn test_contains_key_in_projection() -> anyhow::Result<()> {
    let db = setup(&[(1, Some(r#"{"a": null}"#)), (2, Some("{not json"))])?;
    let data = JsonField::new("data");
    let frag = data.contains_key("$.a").to_sql();

    let mut stmt = db
        .connection()
        .prepare(&format!("SELECT {} FROM docs ORDER BY id", frag.sql))?;
    let flags = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<bool>, _>>()?;
    assert_eq!(flags, vec![true, false]);

    Ok(())
}

#[test]
fn test_path_eq_uses_native_comparison() -> anyhow::Result<()> {
    let db = setup(&[
        (1, Some(r#"{"age": 30, "ok": true, "name": "Alice", "score": 1.5}"#)),
        (2, Some(r#"{"age": "30", "ok": false, "name": "Bob", "score": 2}"#)),
        (3, Some(r#"{"tags": ["x", "y"]}"#)),
    ])?;
    let data = JsonField::new("data");

    assert_eq!(matching_ids(&db, &data.path_eq("$.age", &json!(30)))?, vec![1]);
    assert_eq!(matching_ids(&db, &data.path_eq("$.age", &json!("30")))?, vec![2]);
    assert_eq!(matching_ids(&db, &data.path_eq("$.ok", &json!(true)))?, vec![1]);
    assert_eq!(matching_ids(&db, &data.path_eq("$.ok", &json!(false)))?, vec![2]);
    assert_eq!(matching_ids(&db, &data.path_eq("$.name", &json!("Bob")))?, vec![2]);
    assert_eq!(matching_ids(&db, &data.path_eq("$.score", &json!(2.0)))?, vec![2]);
    assert_eq!(
        matching_ids(&db, &data.path_eq("$.tags", &json!(["x", "y"])))?,
        vec![3]
    );
    assert!(matching_ids(&db, &data.path_eq("$.missing", &json!(null)))?.is_empty());

    Ok(())
}

#[test]
fn test_path_eq_big_integers_compare_as_reals() -> anyhow::Result<()> {
    let db = setup(&[
        (1, Some(r#"{"n": 18446744073709551615}"#)),
        (2, Some(r#"{"n": 9223372036854775807}"#)),
        (3, Some(r#"{"n": "18446744073709551615"}"#)),
    ])?;
    let data = JsonField::new("data");

    assert_eq!(matching_ids(&db, &data.path_eq("$.n", &json!(u64::MAX)))?, vec![1]);
    // Rounded to the same real, so neighbours match too
    assert_eq!(matching_ids(&db, &data.path_eq("$.n", &json!(u64::MAX - 1)))?, vec![1]);
    // In range stays exact
    assert_eq!(matching_ids(&db, &data.path_eq("$.n", &json!(i64::MAX)))?, vec![2]);
    // Exact comparison through the string form
    assert_eq!(
        matching_ids(&db, &data.path_eq("$.n", &json!("18446744073709551615")))?,
        vec![3]
    );

    Ok(())
}

#[test]
fn test_predicates_compose() -> anyhow::Result<()> {
    let db = setup(&[
        (1, Some(r#"{"age": 30, "vip": null}"#)),
        (2, Some(r#"{"age": 30}"#)),
        (3, Some(r#"{"age": 40, "vip": true}"#)),
    ])?;
    let data = JsonField::new("data");

    let both = data.path_eq("$.age", &json!(30)) & data.contains_key("$.vip");
    assert_eq!(matching_ids(&db, &both)?, vec![1]);

    let either = data.path_eq("$.age", &json!(40)) | data.path_eq("$.age", &json!(30));
    assert_eq!(matching_ids(&db, &either)?, vec![1, 2, 3]);

    let neither = !data.contains_key("$.vip");
    assert_eq!(matching_ids(&db, &neither)?, vec![2]);

    let older = data.extract_raw("$.age").gt(Expr::param(35i64));
    assert_eq!(matching_ids(&db, &older)?, vec![3]);

    Ok(())
}

fn apply_set(
    db: &Database,
    data: &JsonField,
    path: &str,
    value: &JsonValue,
    id: i64,
) -> anyhow::Result<()> {
    let frag = data.set_at(path, value).to_sql();
    let sql = format!("UPDATE docs SET {} = {} WHERE id = ?", data.column_expr(), frag.sql);
    let mut params = frag.params.clone();
    params.push(Value::Integer(id));
    db.connection().execute(&sql, params_from_iter(params.iter()))?;
    Ok(())
}

fn load(db: &Database, data: &JsonField, id: i64) -> anyhow::Result<JsonValue> {
    let value = db.connection().query_row(
        "SELECT data FROM docs WHERE id = ?",
        [id],
        |row| data.read(row, 0),
    )?;
    Ok(value)
}

#[test]
fn test_set_at_updates_in_place() -> anyhow::Result<()> {
    let db = setup(&[(1, Some(r#"{"name": "Alice", "age": 30}"#))])?;
    let data = JsonField::new("data");

    apply_set(&db, &data, "$.name", &json!("Bob"), 1)?;
    apply_set(&db, &data, "$.age", &json!(31), 1)?;
    apply_set(&db, &data, "$.ok", &json!(true), 1)?;
    apply_set(&db, &data, "$.tags", &json!(["a", "b"]), 1)?;
    apply_set(&db, &data, "$.meta", &json!({"k": null}), 1)?;
    apply_set(&db, &data, "$.gone", &json!(null), 1)?;
    apply_set(&db, &data, "$.ratio", &json!(0.25), 1)?;

    assert_eq!(
        load(&db, &data, 1)?,
        json!({
            "name": "Bob",
            "age": 31,
            "ok": true,
            "tags": ["a", "b"],
            "meta": {"k": null},
            "gone": null,
            "ratio": 0.25
        })
    );

    Ok(())
}

#[test]
fn test_set_at_value_is_never_interpolated() -> anyhow::Result<()> {
    let db = setup(&[(1, Some("{}")), (2, Some("{}"))])?;
    let data = JsonField::new("data");
    let hostile = json!("x'); DELETE FROM docs; --");

    apply_set(&db, &data, "$.note", &hostile, 1)?;

    assert_eq!(load(&db, &data, 1)?, json!({"note": "x'); DELETE FROM docs; --"}));
    assert_eq!(load(&db, &data, 2)?, json!({}));

    Ok(())
}

#[test]
fn test_custom_column_name_is_used() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    db.connection()
        .execute("CREATE TABLE docs (id INTEGER, payload_json TEXT)", [])?;
    db.connection()
        .execute("INSERT INTO docs VALUES (1, '{\"a\": 1}')", [])?;
    let field = JsonField::new("payload").column_name("payload_json");

    let frag = field.path_eq("$.a", &json!(1)).to_sql();
    let count: i64 = db.connection().query_row(
        &format!("SELECT COUNT(*) FROM docs WHERE {}", frag.sql),
        frag.bound_params(),
        |row| row.get(0),
    )?;
    assert_eq!(count, 1);

    Ok(())
}
