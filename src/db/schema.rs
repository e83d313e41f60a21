//! Catalog database schema.
//!
//! ## Migration System
//!
//! Version-gated: each migration checks the recorded schema version, runs
//! once, and records its version in `db_version`. New databases run every
//! migration in order.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

/// Current schema version. Increment when adding a migration.
pub const SCHEMA_VERSION: i32 = 2;

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS db_version (
      version INTEGER PRIMARY KEY,
      applied_at TEXT NOT NULL,
      description TEXT
    );
    "#,
  )?;

  let current_version = get_schema_version(conn)?;
  tracing::debug!("catalog schema version: {}", current_version);

  if current_version < 1 {
    migrate_v0_to_v1(conn)?;
  }
  if current_version < 2 {
    migrate_v1_to_v2(conn)?;
  }

  Ok(())
}

/// v0→v1: base tables
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
  tracing::info!("Running migration v0→v1: Create catalog tables");

  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS courses (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      title TEXT NOT NULL,
      description TEXT NOT NULL,
      provider TEXT NOT NULL,
      instructor TEXT,
      price REAL,
      type TEXT NOT NULL DEFAULT 'FREE',
      image_url TEXT,
      course_url TEXT,
      rating REAL,
      difficulty TEXT,
      duration TEXT,
      category TEXT,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS admins (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      email TEXT NOT NULL UNIQUE COLLATE NOCASE,
      password TEXT NOT NULL,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS course_progress (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id TEXT NOT NULL,
      course_id INTEGER NOT NULL,
      progress_percentage REAL NOT NULL DEFAULT 0,
      completed INTEGER NOT NULL DEFAULT 0,
      last_accessed TEXT,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS course_ratings (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      course_id INTEGER NOT NULL,
      user_name TEXT NOT NULL,
      rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
      review TEXT,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_favorites (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id TEXT NOT NULL,
      course_id INTEGER NOT NULL,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS achievements (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id TEXT NOT NULL,
      badge_type TEXT NOT NULL,
      badge_name TEXT NOT NULL,
      description TEXT NOT NULL,
      earned_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_courses_created_at ON courses(created_at);
    CREATE INDEX IF NOT EXISTS idx_course_ratings_course ON course_ratings(course_id);
    CREATE INDEX IF NOT EXISTS idx_achievements_user ON achievements(user_id);
    "#,
  )?;

  record_version(conn, 1, "Create catalog tables")?;
  Ok(())
}

/// v1→v2: one progress row and one favorite row per (user, course)
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
  tracing::info!("Running migration v1→v2: Unique progress and favorite pairs");

  let tx = conn.unchecked_transaction()?;
  tx.execute_batch(
    r#"
    DELETE FROM course_progress WHERE id NOT IN (
      SELECT MAX(id) FROM course_progress GROUP BY user_id, course_id
    );
    DELETE FROM user_favorites WHERE id NOT IN (
      SELECT MIN(id) FROM user_favorites GROUP BY user_id, course_id
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_course_progress_pair
      ON course_progress(user_id, course_id);
    CREATE UNIQUE INDEX IF NOT EXISTS idx_user_favorites_pair
      ON user_favorites(user_id, course_id);
    "#,
  )?;
  record_version(&tx, 2, "Unique (user_id, course_id) for progress and favorites")?;
  tx.commit()
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
    params![version, now, description],
  )?;
  tracing::info!("Recorded schema version {} - {}", version, description);
  Ok(())
}

/// Current schema version (0 if none recorded)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
  conn.query_row(
    "SELECT COALESCE(MAX(version), 0) FROM db_version",
    [],
    |row| row.get(0),
  )
}
