//! Connection bootstrap utilities for SQLite.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Schema creation is NOT done here; the store owns it.

use super::{DbError, DbResult, StorePath};
use log::{error, info};
use rusqlite::Connection;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the connection described by `path` and applies connection pragmas.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_connection(path: &StorePath) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = path.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match path {
        StorePath::File(file) => Connection::open(file),
        StorePath::Memory => Connection::open_in_memory(),
    };

    let result = opened
        .map_err(DbError::from)
        .and_then(|conn| configure(&conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

/// Shorthand for `open_connection(&StorePath::Memory)`.
pub fn open_connection_in_memory() -> DbResult<Connection> {
    open_connection(&StorePath::Memory)
}

fn configure(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::open_connection_in_memory;

    #[test]
    fn in_memory_connection_enables_foreign_keys() {
        let conn = open_connection_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
