use chrono::Utc;
use rusqlite::{params, Connection, Result};

use super::{parse_optional_timestamp, parse_timestamp};
use crate::domain::{CourseProgress, ProgressUpdate};

/// Insert or replace the (user, course) progress row
pub fn upsert_progress(conn: &Connection, update: &ProgressUpdate) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO course_progress (user_id, course_id, progress_percentage, completed, last_accessed, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(user_id, course_id) DO UPDATE SET
      progress_percentage = excluded.progress_percentage,
      completed = excluded.completed,
      last_accessed = excluded.last_accessed
    "#,
    params![
      update.user_id,
      update.course_id,
      update.progress_percentage,
      update.completed,
      update.last_accessed.to_rfc3339(),
      Utc::now().to_rfc3339(),
    ],
  )?;
  Ok(())
}

pub fn get_user_progress(conn: &Connection, user_id: &str) -> Result<Vec<CourseProgress>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, user_id, course_id, progress_percentage, completed, last_accessed, created_at
    FROM course_progress WHERE user_id = ?1
    ORDER BY id
    "#,
  )?;
  let rows = stmt
    .query_map(params![user_id], |row| {
      Ok(CourseProgress {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_id: row.get(2)?,
        progress_percentage: row.get(3)?,
        completed: row.get(4)?,
        last_accessed: parse_optional_timestamp(row, 5)?,
        created_at: parse_timestamp(row, 6)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(rows)
}
