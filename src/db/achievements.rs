use chrono::Utc;
use rusqlite::{params, Connection, Result};

use super::parse_timestamp;
use crate::domain::{Achievement, NewAchievement};

pub fn award_achievement(conn: &Connection, achievement: &NewAchievement) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO achievements (user_id, badge_type, badge_name, description, earned_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![
      achievement.user_id,
      achievement.badge_type,
      achievement.badge_name,
      achievement.description,
      Utc::now().to_rfc3339(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Achievements for one user, most recently earned first
pub fn get_user_achievements(conn: &Connection, user_id: &str) -> Result<Vec<Achievement>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, user_id, badge_type, badge_name, description, earned_at
    FROM achievements WHERE user_id = ?1
    ORDER BY earned_at DESC, id DESC
    "#,
  )?;
  let rows = stmt
    .query_map(params![user_id], |row| {
      Ok(Achievement {
        id: row.get(0)?,
        user_id: row.get(1)?,
        badge_type: row.get(2)?,
        badge_name: row.get(3)?,
        description: row.get(4)?,
        earned_at: parse_timestamp(row, 5)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(rows)
}
