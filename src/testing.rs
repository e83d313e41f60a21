//! Test utilities for database setup.
//!
//! Reuses the authoritative migrations so tests never duplicate schema.

use rusqlite::Connection;
use tempfile::TempDir;

/// Migrated catalog database in a temporary directory.
///
/// The directory is removed when the environment is dropped.
pub struct TestEnv {
    /// Kept alive for database file persistence
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("catalog.db"))?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }
}
