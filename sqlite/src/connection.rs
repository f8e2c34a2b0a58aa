//! Connection management: opening stores and the entity-level entry points.
//!
//! [`Connection`] wraps a single `rusqlite::Connection`, either transient
//! in-memory or file-backed (optionally in WAL mode), and exposes the
//! high-level pipeline: configure a table from an entity definition, insert
//! validated records, seed from record files, and run scoped sessions with
//! guaranteed commit-or-rollback.

use std::path::{Path, PathBuf};

use entity_schema_core::{Entity, RawRecord};
use entity_schema_records::RecordSet;
use rusqlite::Transaction;
use tracing::{debug, info};

use crate::config::TableConfig;
use crate::error::{Result, SqliteError};
use crate::table::Table;

/// Wrapper around a SQLite store, owned for the connection's lifetime.
///
/// With no path the store is transient and dies with the connection; with a
/// path the store is file-backed and may enable write-ahead logging for
/// concurrent-read durability. Foreign keys are enabled on every connection.
///
/// All operations execute synchronously on the calling thread; callers
/// sharing one connection across threads must serialize externally.
///
/// # Examples
///
/// ```no_run
/// use entity_schema_core::IndividualBio;
/// use entity_schema_sqlite::Connection;
///
/// let conn = Connection::open("people.db", true).unwrap();
/// conn.create_table::<IndividualBio>().unwrap();
/// assert!(conn.path().is_some());
/// ```
#[derive(Debug)]
pub struct Connection {
    conn: rusqlite::Connection,
    path: Option<PathBuf>,
}

impl Connection {
    /// Opens a transient in-memory store.
    ///
    /// [`path`](Self::path) reports `None`; the store's lifetime ends with
    /// the connection.
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        configure(&conn, false)?;
        Ok(Self { conn, path: None })
    }

    /// Opens or creates a file-backed store at the given path.
    ///
    /// When `wal` is true the store runs in write-ahead-logging mode.
    /// [`path`](Self::path) reports the absolute resolved path, even when a
    /// relative path was given.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::OpenError`] naming the path when the store
    /// cannot be opened or created there.
    pub fn open(path: impl AsRef<Path>, wal: bool) -> Result<Self> {
        let path = path.as_ref();
        let conn = rusqlite::Connection::open(path).map_err(|source| SqliteError::OpenError {
            path: path.to_path_buf(),
            source,
        })?;
        configure(&conn, wal)?;

        // The file exists after a successful open, so this resolves.
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        debug!(path = %resolved.display(), wal, "opened database");
        Ok(Self {
            conn,
            path: Some(resolved),
        })
    }

    /// Absolute path of the backing file; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a handle to the named physical table, creating no schema.
    pub fn table(&self, name: &str) -> Table<'_> {
        Table::new(&self.conn, name.to_string())
    }

    /// Returns a handle to the entity's physical table, creating no schema.
    pub fn entity_table<E: Entity>(&self) -> Table<'_> {
        let def = E::definition();
        Table::new(&self.conn, format!("{}_{}", def.prefix, def.table))
    }

    /// Configures and creates the entity's table, indexes, and FTS shadow
    /// table, returning the handle afterwards.
    ///
    /// Idempotent against an existing matching table; fails with
    /// [`SqliteError::SchemaMismatch`] when an incompatible definition
    /// targets the same physical table, leaving the table in its prior
    /// state.
    pub fn create_table<E: Entity>(&self) -> Result<Table<'_>> {
        let def = E::definition();
        let config = TableConfig::from_definition(&def)?;
        config.apply(&self.conn)?;
        Ok(Table::new(&self.conn, config.table_name().to_string()))
    }

    /// Validates and inserts one raw record, configuring the table first if
    /// needed. Returns the table handle with the row inserted.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::ValidationError`] when the record fails
    /// construction; nothing is inserted in that case.
    pub fn add_record<E: Entity>(&self, raw: &RawRecord) -> Result<Table<'_>> {
        self.add_records::<E>(std::slice::from_ref(raw))
    }

    /// Validates and inserts raw records one at a time, in order.
    ///
    /// Batch insertion is not atomic across the set: each record is
    /// validated and inserted independently, and the first failure surfaces
    /// immediately, leaving previously inserted records in place.
    pub fn add_records<E: Entity>(&self, raws: &[RawRecord]) -> Result<Table<'_>> {
        let def = E::definition();
        let config = TableConfig::from_definition(&def)?;
        config.apply(&self.conn)?;

        let table = Table::new(&self.conn, config.table_name().to_string());
        for raw in raws {
            let record = def.build_record(raw)?;
            table.insert(&record)?;
        }
        Ok(table)
    }

    /// Seeds the entity's table from a directory of JSON record files.
    ///
    /// Records load in file-name order and insert in load order, through
    /// the same validation pipeline as [`add_records`](Self::add_records).
    pub fn seed<E: Entity>(&self, dir: impl AsRef<Path>) -> Result<SeedReport> {
        let set = RecordSet::from_dir(dir)?;
        let table = self.add_records::<E>(set.records())?;
        let report = SeedReport {
            records_inserted: set.len(),
        };
        info!(
            table = table.name(),
            records = report.records_inserted,
            "seeded table"
        );
        Ok(report)
    }

    /// Runs a closure inside a scoped session over this connection.
    ///
    /// The session is a transaction handed to the closure for arbitrary
    /// statement execution. On `Ok` the transaction commits; on `Err` it
    /// rolls back. Release is guaranteed on every exit path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use entity_schema_sqlite::Connection;
    /// let conn = Connection::open_in_memory().unwrap();
    /// let text: String = conn
    ///     .with_session(|session| {
    ///         session.execute("CREATE TABLE t (id INTEGER, text TEXT)", [])?;
    ///         session.execute("INSERT INTO t VALUES (1, 'hello-world')", [])?;
    ///         let text = session.query_row(
    ///             "SELECT text FROM t WHERE id = 1",
    ///             [],
    ///             |row| row.get(0),
    ///         )?;
    ///         Ok(text)
    ///     })
    ///     .unwrap();
    /// assert_eq!(text, "hello-world");
    /// ```
    pub fn with_session<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(error) => {
                let _ = tx.rollback();
                Err(error)
            }
        }
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

/// Report of a seed operation.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Number of records inserted.
    pub records_inserted: usize,
}

fn configure(conn: &rusqlite::Connection, wal: bool) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    if wal {
        let _: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    }
    Ok(())
}
