use chrono::Utc;
use rusqlite::{params, Connection, Result};

use super::parse_timestamp;
use crate::domain::{CourseRating, NewRating};

pub fn insert_rating(conn: &Connection, rating: &NewRating) -> Result<i64> {
  conn.execute(
    "INSERT INTO course_ratings (course_id, user_name, rating, review, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      rating.course_id,
      rating.user_name,
      rating.rating,
      rating.review,
      Utc::now().to_rfc3339(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Ratings for one course, newest first
pub fn get_course_ratings(conn: &Connection, course_id: i64) -> Result<Vec<CourseRating>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, course_id, user_name, rating, review, created_at
    FROM course_ratings WHERE course_id = ?1
    ORDER BY created_at DESC, id DESC
    "#,
  )?;
  let ratings = stmt
    .query_map(params![course_id], |row| {
      Ok(CourseRating {
        id: row.get(0)?,
        course_id: row.get(1)?,
        user_name: row.get(2)?,
        rating: row.get(3)?,
        review: row.get(4)?,
        created_at: parse_timestamp(row, 5)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(ratings)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  #[test]
  fn test_repeat_ratings_accumulate() {
    let env = TestEnv::new().unwrap();
    let first = NewRating::new(1, "Ana", 4, None).unwrap();
    let second = NewRating::new(1, "Ana", 2, Some("changed my mind")).unwrap();
    insert_rating(&env.conn, &first).unwrap();
    insert_rating(&env.conn, &second).unwrap();
    insert_rating(&env.conn, &NewRating::new(2, "Ben", 5, None).unwrap()).unwrap();

    let ratings = get_course_ratings(&env.conn, 1).unwrap();
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0].rating, 2);
    assert_eq!(ratings[0].review.as_deref(), Some("changed my mind"));
  }
}
