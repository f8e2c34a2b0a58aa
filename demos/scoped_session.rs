//! Scoped sessions: commit on success, rollback on error.
//!
//! Run with: `cargo run -p entity-schema-demos --example scoped_session`

use entity_schema_sqlite::{Connection, SqliteError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn = Connection::open_in_memory()?;

    // Normal exit: every statement commits together.
    let text: String = conn.with_session(|session| {
        session.execute("CREATE TABLE t (id INTEGER, text TEXT)", [])?;
        session.execute("INSERT INTO t VALUES (1, 'hello-world')", [])?;
        let text = session.query_row("SELECT text FROM t WHERE id = 1", [], |row| row.get(0))?;
        Ok(text)
    })?;
    println!("committed session read back: {text}");

    // Error exit: the insert rolls back with the session.
    let failed: Result<(), SqliteError> = conn.with_session(|session| {
        session.execute("INSERT INTO t VALUES (2, 'doomed')", [])?;
        session.execute("INSERT INTO no_such_table VALUES (1)", [])?;
        Ok(())
    });
    println!("failing session result: {:?}", failed.err().map(|e| e.to_string()));

    let count: i64 = conn
        .connection()
        .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))?;
    println!("rows after rollback: {count}");

    Ok(())
}
