use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::parse_timestamp;
use crate::domain::AdminRecord;

/// Insert an admin. `password_hash` must already be hashed.
pub fn create_admin(conn: &Connection, email: &str, password_hash: &str) -> Result<i64> {
  conn.execute(
    "INSERT INTO admins (email, password, created_at) VALUES (?1, ?2, ?3)",
    params![email, password_hash, Utc::now().to_rfc3339()],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_admin_by_email(conn: &Connection, email: &str) -> Result<Option<AdminRecord>> {
  conn
    .query_row(
      "SELECT id, email, password, created_at FROM admins WHERE email = ?1",
      params![email],
      |row| {
        Ok(AdminRecord {
          id: row.get(0)?,
          email: row.get(1)?,
          password: row.get(2)?,
          created_at: parse_timestamp(row, 3)?,
        })
      },
    )
    .optional()
}

pub fn count_admins(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))
}
