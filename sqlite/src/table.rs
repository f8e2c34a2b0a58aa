//! Table handles: row-level access to one physical table.
//!
//! A [`Table`] borrows its connection and addresses one table by physical
//! name. Looking a handle up never creates schema; configuration is the
//! [`TableConfig`](crate::TableConfig) apply step's job.

use entity_schema_core::Record;
use rusqlite::Connection;

use crate::convert::{row_to_record, to_sql};
use crate::error::{Result, SqliteError};

/// Handle to one physical table on a borrowed connection.
///
/// # Examples
///
/// ```no_run
/// use entity_schema_core::IndividualBio;
/// use entity_schema_sqlite::Connection;
///
/// let conn = Connection::open_in_memory().unwrap();
/// let tbl = conn.create_table::<IndividualBio>().unwrap();
/// assert_eq!(tbl.name(), "pax_tbl_individual_bio");
/// assert_eq!(tbl.count().unwrap(), 0);
/// ```
#[derive(Debug)]
pub struct Table<'conn> {
    conn: &'conn Connection,
    name: String,
}

impl<'conn> Table<'conn> {
    pub(crate) fn new(conn: &'conn Connection, name: String) -> Self {
        Self { conn, name }
    }

    /// Physical table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks whether the table exists in the database.
    pub fn exists(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [&self.name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Returns the row count.
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Returns the live column set as `(name, declared type)` pairs.
    pub fn columns(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type FROM pragma_table_info(?1)")?;
        let columns = stmt
            .query_map([&self.name], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Returns the table's index names in creation order.
    ///
    /// SQLite's implicit indexes (`sqlite_autoindex_*`) are excluded, so a
    /// configured table reports exactly its declared indexes, in the order
    /// they were declared.
    pub fn index_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type='index' AND tbl_name=?1 AND name NOT LIKE 'sqlite_autoindex%' \
             ORDER BY rowid",
        )?;
        let names = stmt
            .query_map([&self.name], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Looks up the FTS shadow table under its deterministic name
    /// (`<table>_fts`), returning the name when the shadow table exists.
    pub fn fts_table(&self) -> Result<Option<String>> {
        let candidate = format!("{}_fts", self.name);
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [&candidate],
            |row| row.get(0),
        )?;
        Ok((count > 0).then_some(candidate))
    }

    /// Inserts a normalized record as one row, returning the assigned row id.
    ///
    /// The primary key is auto-assigned by the store; insertion order is
    /// preserved and ids are sequential from 1 over the table's lifetime.
    pub fn insert(&self, record: &Record) -> Result<i64> {
        let columns = record.column_names();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            columns.join(", "),
            placeholders.join(", ")
        );
        let params: Vec<rusqlite::types::Value> =
            record.iter().map(|(_, value)| to_sql(value)).collect();
        self.conn.execute(&sql, rusqlite::params_from_iter(params))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Reads every row as an ordered column-name-to-value mapping.
    ///
    /// Columns come back in table order (primary key first on configured
    /// tables); rows come back in storage order, which for auto-key tables
    /// is insertion order.
    pub fn rows(&self) -> Result<Vec<Record>> {
        self.query_records(&format!("SELECT * FROM {}", self.name), &[])
    }

    /// Reads a single row by primary key id.
    pub fn row(&self, id: i64) -> Result<Option<Record>> {
        let mut rows = self.query_records(
            &format!("SELECT * FROM {} WHERE id = ?1", self.name),
            &[rusqlite::types::Value::Integer(id)],
        )?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// Runs a full-text match against the FTS shadow table.
    ///
    /// Returns matching rows from the primary table, best match first.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::NoFullTextSearch`] when the table has no
    /// shadow table.
    pub fn search(&self, query: &str) -> Result<Vec<Record>> {
        let Some(fts) = self.fts_table()? else {
            return Err(SqliteError::NoFullTextSearch(self.name.clone()));
        };
        let sql = format!(
            "SELECT t.* FROM {table} AS t JOIN {fts} ON {fts}.rowid = t.rowid \
             WHERE {fts} MATCH ?1 ORDER BY rank",
            table = self.name,
        );
        self.query_records(&sql, &[rusqlite::types::Value::Text(query.to_string())])
    }

    fn query_records(&self, sql: &str, params: &[rusqlite::types::Value]) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let records = stmt
            .query_map(rusqlite::params_from_iter(params.iter().cloned()), |row| {
                row_to_record(row, &column_names)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
