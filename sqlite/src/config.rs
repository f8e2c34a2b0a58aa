//! Table configuration resolved from entity definitions.
//!
//! [`TableConfig`] turns a declarative [`EntityDef`] into the concrete shape
//! of one physical table: column set, primary key, deterministically named
//! indexes, and the optional full-text-search shadow table. Configuration is
//! derived purely from the definition's static declarations and never from
//! data present in the table; it is computed once per `create_table` call,
//! applied, and not retained.
//!
//! # Naming scheme
//!
//! With an entity prefix `pax_tbl` and table `individual_bio`:
//!
//! - physical table: `pax_tbl_individual_bio`
//! - index over `(first_name, last_name)`:
//!   `idx_pax_tbl_individual_bio_first_name_last_name`
//! - FTS shadow table: `pax_tbl_individual_bio_fts`
//!
//! Prefixes must contain only alphanumeric characters and underscores, which
//! allows multiple isolated entity namespaces in the same database.

use entity_schema_core::{EntityDef, FieldType, validate_definition};
use rusqlite::Connection;
use tracing::debug;

use crate::convert::sql_type;
use crate::error::{Result, SqliteError};

/// Validates that a table prefix contains only alphanumeric characters and
/// underscores.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    if !prefix.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// One resolved index: deterministic name plus covered columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Index name, `idx_<physical table>_<col1>_<col2>...`.
    pub name: String,
    /// Covered columns, in declaration order.
    pub columns: Vec<String>,
}

/// Resolved table shape for one entity definition.
///
/// # Examples
///
/// ```
/// use entity_schema_core::{Entity, IndividualBio};
/// use entity_schema_sqlite::TableConfig;
///
/// let config = TableConfig::from_definition(&IndividualBio::definition()).unwrap();
/// assert_eq!(config.table_name(), "pax_tbl_individual_bio");
/// assert_eq!(config.pks(), ["id"]);
/// assert_eq!(config.fts_table(), Some("pax_tbl_individual_bio_fts"));
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    table: String,
    columns: Vec<(String, FieldType)>,
    pks: Vec<String>,
    indexes: Vec<IndexConfig>,
    fts_table: Option<String>,
    fts_columns: Vec<String>,
    auto_id: bool,
}

impl TableConfig {
    /// Resolves an entity definition into a concrete table configuration.
    ///
    /// Algorithm: start from the definition's storable column set; add an
    /// auto-increment integer `id` as sole primary key unless the definition
    /// declares its own; resolve declared index specifications into
    /// deterministically named indexes, preserving declaration order; name
    /// the FTS shadow table when the definition declares one.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] for malformed prefixes and
    /// [`SqliteError::ValidationError`] when the definition itself is
    /// structurally invalid.
    pub fn from_definition(def: &EntityDef) -> Result<Self> {
        validate_prefix(&def.prefix)?;
        if let Some(error) = validate_definition(def).into_iter().next() {
            return Err(error.into());
        }

        let table = format!("{}_{}", def.prefix, def.table);
        let auto_id = def.primary_key.is_empty();

        let mut columns = Vec::with_capacity(def.fields.len() + 1);
        if auto_id {
            columns.push(("id".to_string(), FieldType::Integer));
        }
        columns.extend(def.columns());

        let pks = if auto_id {
            vec!["id".to_string()]
        } else {
            def.primary_key.clone()
        };

        let indexes = def
            .indexes
            .iter()
            .map(|spec| IndexConfig {
                name: format!("idx_{}_{}", table, spec.columns.join("_")),
                columns: spec.columns.clone(),
            })
            .collect();

        let fts_table = def.full_text_search.then(|| format!("{table}_fts"));
        let fts_columns = def
            .fields
            .iter()
            .filter(|f| f.field_type == FieldType::Text)
            .map(|f| f.name.clone())
            .collect();

        Ok(Self {
            table,
            columns,
            pks,
            indexes,
            fts_table,
            fts_columns,
            auto_id,
        })
    }

    /// Physical table name, `<prefix>_<table>`.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Resolved columns including any auto-generated primary key.
    pub fn columns(&self) -> &[(String, FieldType)] {
        &self.columns
    }

    /// Primary-key column list.
    pub fn pks(&self) -> &[String] {
        &self.pks
    }

    /// Resolved indexes, in declaration order.
    pub fn indexes(&self) -> &[IndexConfig] {
        &self.indexes
    }

    /// Deterministic FTS shadow-table name, when declared.
    pub fn fts_table(&self) -> Option<&str> {
        self.fts_table.as_deref()
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for the resolved shape.
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.columns.len() + 1);
        for (name, field_type) in &self.columns {
            if self.auto_id && name == "id" {
                parts.push("id INTEGER PRIMARY KEY AUTOINCREMENT".to_string());
            } else {
                parts.push(format!("{name} {}", sql_type(*field_type)));
            }
        }
        if !self.auto_id {
            parts.push(format!("PRIMARY KEY ({})", self.pks.join(", ")));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table,
            parts.join(",\n    ")
        )
    }

    /// `CREATE INDEX IF NOT EXISTS` statements, in declaration order.
    pub fn index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {}({})",
                    index.name,
                    self.table,
                    index.columns.join(", ")
                )
            })
            .collect()
    }

    /// `CREATE VIRTUAL TABLE` statement for the FTS shadow table, when
    /// declared.
    ///
    /// The shadow table is an external-content FTS5 table over the entity's
    /// text columns, reading row content from the primary table.
    pub fn fts_sql(&self) -> Option<String> {
        let fts = self.fts_table.as_deref()?;
        let mut args: Vec<String> = self.fts_columns.clone();
        args.push(format!("content='{}'", self.table));
        if self.auto_id {
            args.push("content_rowid='id'".to_string());
        }
        Some(format!(
            "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5(\n    {}\n)",
            fts,
            args.join(",\n    ")
        ))
    }

    /// Content-sync triggers keeping the FTS shadow table in step with the
    /// primary table on insert, delete, and update.
    pub fn trigger_sql(&self) -> Vec<String> {
        let Some(fts) = self.fts_table.as_deref() else {
            return Vec::new();
        };
        let table = &self.table;
        let rowid = if self.auto_id { "id" } else { "rowid" };
        let cols = self.fts_columns.join(", ");
        let new_cols: Vec<String> = self
            .fts_columns
            .iter()
            .map(|c| format!("new.{c}"))
            .collect();
        let old_cols: Vec<String> = self
            .fts_columns
            .iter()
            .map(|c| format!("old.{c}"))
            .collect();
        let new_cols = new_cols.join(", ");
        let old_cols = old_cols.join(", ");

        vec![
            format!(
                "CREATE TRIGGER IF NOT EXISTS {table}_fts_ai AFTER INSERT ON {table} BEGIN\n\
                 \x20   INSERT INTO {fts}(rowid, {cols}) VALUES (new.{rowid}, {new_cols});\n\
                 END"
            ),
            format!(
                "CREATE TRIGGER IF NOT EXISTS {table}_fts_ad AFTER DELETE ON {table} BEGIN\n\
                 \x20   INSERT INTO {fts}({fts}, rowid, {cols}) VALUES ('delete', old.{rowid}, {old_cols});\n\
                 END"
            ),
            format!(
                "CREATE TRIGGER IF NOT EXISTS {table}_fts_au AFTER UPDATE ON {table} BEGIN\n\
                 \x20   INSERT INTO {fts}({fts}, rowid, {cols}) VALUES ('delete', old.{rowid}, {old_cols});\n\
                 \x20   INSERT INTO {fts}(rowid, {cols}) VALUES (new.{rowid}, {new_cols});\n\
                 END"
            ),
        ]
    }

    /// Applies the configuration to the database, idempotently.
    ///
    /// An existing table with a matching column shape is left alone;
    /// conflicting columns fail with [`SqliteError::SchemaMismatch`] before
    /// anything is touched. Table, indexes, FTS shadow table, and triggers
    /// are created inside one transaction, each with `IF NOT EXISTS`, so a
    /// failed apply leaves no partial artifacts and a retry is harmless.
    pub fn apply(&self, conn: &Connection) -> Result<()> {
        self.check_existing(conn)?;

        let tx = conn.unchecked_transaction()?;
        debug!(table = %self.table, "applying table configuration");
        tx.execute_batch(&self.create_table_sql())?;
        for statement in self.index_sql() {
            tx.execute_batch(&statement)?;
        }
        if let Some(statement) = self.fts_sql() {
            debug!(table = %self.table, fts = ?self.fts_table, "creating fts shadow table");
            tx.execute_batch(&statement)?;
            for trigger in self.trigger_sql() {
                tx.execute_batch(&trigger)?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Compares the resolved shape against an existing physical table.
    ///
    /// A missing table passes. An existing table must carry exactly the
    /// resolved columns with matching types.
    fn check_existing(&self, conn: &Connection) -> Result<()> {
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [&self.table],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Ok(());
        }

        let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1)")?;
        let live: Vec<(String, String)> = stmt
            .query_map([&self.table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mismatch = |detail: String| {
            Err(SqliteError::SchemaMismatch {
                table: self.table.clone(),
                detail,
            })
        };

        for (name, field_type) in &self.columns {
            match live.iter().find(|(live_name, _)| live_name == name) {
                None => return mismatch(format!("table is missing column '{name}'")),
                Some((_, live_type)) => {
                    let expected = sql_type(*field_type);
                    if !live_type.eq_ignore_ascii_case(expected) {
                        return mismatch(format!(
                            "column '{name}' is {expected} in the definition but {live_type} in the table"
                        ));
                    }
                }
            }
        }
        for (name, _) in &live {
            if !self.columns.iter().any(|(expected, _)| expected == name) {
                return mismatch(format!("table has extra column '{name}'"));
            }
        }

        Ok(())
    }
}
