//! SQLite storage for photo assets.
//!
//! Connections are opened per unit of work, the same way the handlers and
//! blocking jobs used them before; SQLite serializes writers on its own.

pub mod assets;

use crate::error::Result;
use log::info;
use rusqlite::Connection;
use std::path::Path;

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_photo_assets.sql"))];

/// Opens (or creates) the database file and brings the schema up to date.
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    Ok(conn)
}

/// Schema-complete database that lives as long as the connection.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    run_migrations(conn)
}

fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current = current_version(conn);
    for (version, sql) in MIGRATIONS {
        if *version > current {
            info!("Running migration v{}", version);
            conn.execute_batch(sql)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = open_memory_database().unwrap();
        assert_eq!(current_version(&conn), 1);
        run_migrations(&conn).unwrap();
        assert_eq!(current_version(&conn), 1);
    }

    #[test]
    fn reopening_a_file_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pod.sqlite");
        drop(open_database(&path).unwrap());
        let conn = open_database(&path).unwrap();
        assert_eq!(current_version(&conn), 1);
    }
}
