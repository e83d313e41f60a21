use chrono::Utc;
use rusqlite::{params, Connection, Result};

use crate::domain::FavoriteState;

/// Remove the pair if present, otherwise add it, inside one transaction.
pub fn toggle_favorite(conn: &Connection, user_id: &str, course_id: i64) -> Result<FavoriteState> {
  let tx = conn.unchecked_transaction()?;

  let removed = tx.execute(
    "DELETE FROM user_favorites WHERE user_id = ?1 AND course_id = ?2",
    params![user_id, course_id],
  )?;

  let state = if removed > 0 {
    FavoriteState::Removed
  } else {
    tx.execute(
      "INSERT OR IGNORE INTO user_favorites (user_id, course_id, created_at) VALUES (?1, ?2, ?3)",
      params![user_id, course_id, Utc::now().to_rfc3339()],
    )?;
    FavoriteState::Added
  };

  tx.commit()?;
  Ok(state)
}

/// Course ids the user has favorited
pub fn get_user_favorites(conn: &Connection, user_id: &str) -> Result<Vec<i64>> {
  let mut stmt =
    conn.prepare("SELECT course_id FROM user_favorites WHERE user_id = ?1 ORDER BY id")?;
  let ids = stmt
    .query_map(params![user_id], |row| row.get(0))?
    .collect::<Result<Vec<i64>>>()?;
  Ok(ids)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  #[test]
  fn test_toggle_twice_restores_membership() {
    let env = TestEnv::new().unwrap();
    assert!(get_user_favorites(&env.conn, "ana").unwrap().is_empty());

    assert_eq!(toggle_favorite(&env.conn, "ana", 3).unwrap(), FavoriteState::Added);
    assert_eq!(get_user_favorites(&env.conn, "ana").unwrap(), vec![3]);

    assert_eq!(toggle_favorite(&env.conn, "ana", 3).unwrap(), FavoriteState::Removed);
    assert!(get_user_favorites(&env.conn, "ana").unwrap().is_empty());
  }

  #[test]
  fn test_favorites_are_per_user() {
    let env = TestEnv::new().unwrap();
    toggle_favorite(&env.conn, "ana", 1).unwrap();
    toggle_favorite(&env.conn, "ben", 1).unwrap();
    toggle_favorite(&env.conn, "ben", 2).unwrap();

    assert_eq!(get_user_favorites(&env.conn, "ana").unwrap(), vec![1]);
    assert_eq!(get_user_favorites(&env.conn, "ben").unwrap(), vec![1, 2]);
  }
}
