//! SQLite storage backend for declarative entities.
//!
//! This crate maps [`EntityDef`](entity_schema_core::EntityDef) values onto
//! physical SQLite tables: it derives the column set and primary key,
//! creates deterministically named indexes and an optional full-text-search
//! shadow table, and inserts validated, normalized records.
//!
//! # Architecture
//!
//! - **`config`** — [`TableConfig`]: resolves a definition into a concrete
//!   table shape and applies it idempotently.
//! - **`connection`** — [`Connection`]: store lifecycle (in-memory or
//!   file-backed with optional WAL), entity-level entry points, seeding,
//!   and scoped sessions.
//! - **`table`** — [`Table`]: row-level access to one physical table.
//! - **`convert`** — value and row conversions between core types and
//!   SQLite.
//!
//! # Quick start
//!
//! ```no_run
//! use entity_schema_core::IndividualBio;
//! use entity_schema_sqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! conn.create_table::<IndividualBio>().unwrap();
//!
//! let raw = serde_json::json!({
//!     "first_name": "Juan",
//!     "last_name": "Doe",
//!     "suffix": "Jr.",
//!     "gender": "MALE",
//! });
//! let tbl = conn
//!     .add_record::<IndividualBio>(raw.as_object().unwrap())
//!     .unwrap();
//!
//! for row in tbl.rows().unwrap() {
//!     println!("{:?} -> {:?}", row.get("id"), row.get("full_name"));
//! }
//! ```
//!
//! # Scoped sessions
//!
//! Arbitrary statements run inside [`Connection::with_session`], which
//! commits on success and rolls back on error, releasing the transaction on
//! every exit path.

mod config;
mod connection;
mod convert;
mod error;
mod table;

pub use config::{IndexConfig, TableConfig};
pub use connection::{Connection, SeedReport};
pub use error::{Result, SqliteError};
pub use table::Table;
