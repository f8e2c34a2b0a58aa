//! Integration tests for the entity-schema-sqlite crate.

use entity_schema_core::{
    Entity, EntityDef, FieldDef, FieldType, FieldValue, IndividualBio, RawRecord,
};
use entity_schema_sqlite::{Connection, SqliteError, TableConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn raw(value: serde_json::Value) -> RawRecord {
    value.as_object().expect("raw record fixture").clone()
}

fn person1() -> RawRecord {
    raw(serde_json::json!({
        "first_name": "Juan",
        "last_name": "Doe",
        "suffix": "Jr.",
        "gender": "male",
    }))
}

fn person2() -> RawRecord {
    raw(serde_json::json!({
        "first_name": "Jane",
        "last_name": "Doe",
        "suffix": null,
        "gender": "FEMALE",
        "nick_name": "Jany",
    }))
}

/// Same physical table as the bio fixture, conflicting column types.
struct ConflictingBio;

impl Entity for ConflictingBio {
    fn definition() -> EntityDef {
        EntityDef::new("pax_tbl", "individual_bio")
            .with_field(FieldDef::optional("full_name", FieldType::Integer))
    }
}

// ---------------------------------------------------------------------------
// Definition and configuration
// ---------------------------------------------------------------------------

#[test]
fn test_columns_from_definition() {
    let def = IndividualBio::definition();
    let mut columns = def.columns();
    columns.sort_by(|a, b| a.0.cmp(&b.0));

    let mut expected = vec![
        ("full_name".to_string(), FieldType::Text),
        ("first_name".to_string(), FieldType::Text),
        ("last_name".to_string(), FieldType::Text),
        ("suffix".to_string(), FieldType::Text),
        ("nick_name".to_string(), FieldType::Text),
        ("gender".to_string(), FieldType::Text),
    ];
    expected.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(columns, expected);
    assert!(!columns.iter().any(|(name, _)| name == "id"));
}

#[test]
fn test_table_config_primary_key_and_names() {
    let config = TableConfig::from_definition(&IndividualBio::definition()).unwrap();

    let mut columns: Vec<(String, FieldType)> = config.columns().to_vec();
    columns.sort_by(|a, b| a.0.cmp(&b.0));
    let mut expected = IndividualBio::definition().columns();
    expected.push(("id".to_string(), FieldType::Integer));
    expected.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(columns, expected);

    assert_eq!(config.pks(), ["id"]);
    assert_eq!(config.fts_table(), Some("pax_tbl_individual_bio_fts"));
    assert_eq!(
        config
            .indexes()
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>(),
        vec![
            "idx_pax_tbl_individual_bio_first_name_last_name",
            "idx_pax_tbl_individual_bio_last_name",
            "idx_pax_tbl_individual_bio_full_name",
        ]
    );
}

#[test]
fn test_create_table_applies_configuration() {
    let conn = Connection::open_in_memory().unwrap();
    let tbl = conn.create_table::<IndividualBio>().unwrap();

    assert!(tbl.exists().unwrap());
    assert_eq!(
        tbl.index_names().unwrap(),
        vec![
            "idx_pax_tbl_individual_bio_first_name_last_name",
            "idx_pax_tbl_individual_bio_last_name",
            "idx_pax_tbl_individual_bio_full_name",
        ]
    );
    assert_eq!(
        tbl.fts_table().unwrap(),
        Some("pax_tbl_individual_bio_fts".to_string())
    );
}

#[test]
fn test_create_table_twice_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    conn.create_table::<IndividualBio>().unwrap();
    let tbl = conn.create_table::<IndividualBio>().unwrap();
    assert!(tbl.exists().unwrap());
    assert_eq!(tbl.index_names().unwrap().len(), 3);
}

#[test]
fn test_create_table_rejects_conflicting_definition() {
    let conn = Connection::open_in_memory().unwrap();
    conn.create_table::<IndividualBio>().unwrap();

    let err = conn.create_table::<ConflictingBio>().unwrap_err();
    assert!(matches!(err, SqliteError::SchemaMismatch { .. }));

    // Prior state untouched
    let tbl = conn.entity_table::<IndividualBio>();
    assert_eq!(tbl.index_names().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Record insertion and normalization
// ---------------------------------------------------------------------------

#[test]
fn test_add_record_normalizes_gender() {
    let conn = Connection::open_in_memory().unwrap();
    let tbl = conn.add_record::<IndividualBio>(&person2()).unwrap();

    let rows = tbl.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&FieldValue::Integer(1)));
    assert_eq!(rows[0].get("gender").unwrap().as_text(), Some("female"));
}

#[test]
fn test_insert_records_assigns_sequential_ids() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(dir.path().join("test.db"), false).unwrap();

    conn.create_table::<IndividualBio>().unwrap();
    let tbl = conn
        .add_records::<IndividualBio>(&[person1(), person2()])
        .unwrap();

    let rows = tbl.rows().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].get("id"), Some(&FieldValue::Integer(1)));
    assert_eq!(
        rows[0].get("full_name").unwrap().as_text(),
        Some("Juan Doe, Jr.")
    );
    assert_eq!(rows[0].get("first_name").unwrap().as_text(), Some("Juan"));
    assert_eq!(rows[0].get("suffix").unwrap().as_text(), Some("Jr."));
    assert_eq!(rows[0].get("nick_name"), Some(&FieldValue::Null));
    assert_eq!(rows[0].get("gender").unwrap().as_text(), Some("male"));

    assert_eq!(rows[1].get("id"), Some(&FieldValue::Integer(2)));
    assert_eq!(rows[1].get("full_name").unwrap().as_text(), Some("Jane Doe"));
    assert_eq!(rows[1].get("suffix"), Some(&FieldValue::Null));
    assert_eq!(rows[1].get("nick_name").unwrap().as_text(), Some("Jany"));
    assert_eq!(rows[1].get("gender").unwrap().as_text(), Some("female"));
}

#[test]
fn test_batch_failure_keeps_earlier_records() {
    let conn = Connection::open_in_memory().unwrap();

    let invalid = raw(serde_json::json!({ "first_name": "Solo" }));
    let err = conn
        .add_records::<IndividualBio>(&[person1(), invalid])
        .unwrap_err();
    assert!(matches!(err, SqliteError::ValidationError(_)));

    let tbl = conn.entity_table::<IndividualBio>();
    assert_eq!(tbl.count().unwrap(), 1);
}

#[test]
fn test_row_columns_come_back_in_table_order() {
    let conn = Connection::open_in_memory().unwrap();
    let tbl = conn.add_record::<IndividualBio>(&person1()).unwrap();

    let rows = tbl.rows().unwrap();
    assert_eq!(
        rows[0].column_names(),
        vec![
            "id",
            "full_name",
            "first_name",
            "last_name",
            "suffix",
            "nick_name",
            "gender",
        ]
    );
}

// ---------------------------------------------------------------------------
// Connection paths and modes
// ---------------------------------------------------------------------------

#[test]
fn test_no_path_for_in_memory_store() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(conn.path().is_none());
}

#[test]
fn test_relative_path_reports_absolute() {
    let name = "es_sqlite_relpath_test.db";
    let conn = Connection::open(name, false).unwrap();

    let path = conn.path().unwrap().to_path_buf();
    assert!(path.is_absolute());
    assert!(path.ends_with(name));

    drop(conn);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_wal_mode_enabled_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(dir.path().join("wal.db"), true).unwrap();

    let mode: String = conn
        .connection()
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn test_open_fails_on_unwritable_path() {
    let err = Connection::open("/nonexistent_dir/sub/test.db", false).unwrap_err();
    assert!(matches!(err, SqliteError::OpenError { .. }));
}

// ---------------------------------------------------------------------------
// Scoped sessions
// ---------------------------------------------------------------------------

#[test]
fn test_session_statements_visible_after_commit() {
    let conn = Connection::open_in_memory().unwrap();

    let text: String = conn
        .with_session(|session| {
            session.execute("CREATE TABLE t (id INTEGER, text TEXT)", [])?;
            session.execute("INSERT INTO t VALUES (1, 'hello-world')", [])?;
            let text = session.query_row("SELECT text FROM t WHERE id = 1", [], |row| row.get(0))?;
            Ok(text)
        })
        .unwrap();
    assert_eq!(text, "hello-world");

    // Visible to a later query on the same connection
    let count: i64 = conn
        .connection()
        .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_session_error_rolls_back() {
    let conn = Connection::open_in_memory().unwrap();
    conn.connection()
        .execute("CREATE TABLE t (id INTEGER)", [])
        .unwrap();

    let result: Result<(), SqliteError> = conn.with_session(|session| {
        session.execute("INSERT INTO t VALUES (1)", [])?;
        session.execute("INSERT INTO missing_table VALUES (1)", [])?;
        Ok(())
    });
    assert!(result.is_err());

    let count: i64 = conn
        .connection()
        .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Seeding and search
// ---------------------------------------------------------------------------

#[test]
fn test_seed_from_record_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("01_juan.json"),
        r#"{ "first_name": "Juan", "last_name": "Doe", "suffix": "Jr.", "gender": "male" }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("02_jane.json"),
        r#"{ "first_name": "Jane", "last_name": "Doe", "gender": "FEMALE" }"#,
    )
    .unwrap();

    let conn = Connection::open_in_memory().unwrap();
    let report = conn.seed::<IndividualBio>(dir.path()).unwrap();
    assert_eq!(report.records_inserted, 2);

    let rows = conn.entity_table::<IndividualBio>().rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].get("full_name").unwrap().as_text(),
        Some("Juan Doe, Jr.")
    );
    assert_eq!(rows[1].get("gender").unwrap().as_text(), Some("female"));
}

#[test]
fn test_full_text_search_finds_inserted_rows() {
    let conn = Connection::open_in_memory().unwrap();
    let tbl = conn
        .add_records::<IndividualBio>(&[person1(), person2()])
        .unwrap();

    let hits = tbl.search("Juan").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get("first_name").unwrap().as_text(), Some("Juan"));

    let nobody = tbl.search("Zoilo").unwrap();
    assert!(nobody.is_empty());
}
