use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::parse_timestamp;
use crate::domain::{Course, CourseDraft, CourseType, Difficulty};

const COURSE_COLUMNS: &str = "id, title, description, provider, instructor, price, type, image_url, \
                              course_url, rating, difficulty, duration, category, created_at";

pub fn count_courses(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))
}

/// All courses, newest first
pub fn get_courses(conn: &Connection) -> Result<Vec<Course>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM courses ORDER BY created_at DESC, id DESC",
    COURSE_COLUMNS
  ))?;
  let courses = stmt
    .query_map([], row_to_course)?
    .collect::<Result<Vec<_>>>()?;
  Ok(courses)
}

pub fn get_course_by_id(conn: &Connection, id: i64) -> Result<Option<Course>> {
  conn
    .query_row(
      &format!("SELECT {} FROM courses WHERE id = ?1", COURSE_COLUMNS),
      params![id],
      row_to_course,
    )
    .optional()
}

pub fn insert_course(conn: &Connection, draft: &CourseDraft) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO courses (title, description, provider, instructor, price, type, image_url,
                         course_url, rating, difficulty, duration, category, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
    "#,
    params![
      draft.title,
      draft.description,
      draft.provider,
      draft.instructor,
      draft.price,
      draft.course_type.as_str(),
      draft.image_url,
      draft.course_url,
      draft.rating,
      draft.difficulty.map(|d| d.as_str()),
      draft.duration,
      draft.category,
      Utc::now().to_rfc3339(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Returns the number of rows changed (0 when the id does not exist)
pub fn update_course(conn: &Connection, id: i64, draft: &CourseDraft) -> Result<usize> {
  conn.execute(
    r#"
    UPDATE courses SET title = ?1, description = ?2, provider = ?3, instructor = ?4, price = ?5,
                       type = ?6, image_url = ?7, course_url = ?8, rating = ?9, difficulty = ?10,
                       duration = ?11, category = ?12
    WHERE id = ?13
    "#,
    params![
      draft.title,
      draft.description,
      draft.provider,
      draft.instructor,
      draft.price,
      draft.course_type.as_str(),
      draft.image_url,
      draft.course_url,
      draft.rating,
      draft.difficulty.map(|d| d.as_str()),
      draft.duration,
      draft.category,
      id,
    ],
  )
}

/// Dependent progress, ratings and favorites are left in place
pub fn delete_course(conn: &Connection, id: i64) -> Result<usize> {
  conn.execute("DELETE FROM courses WHERE id = ?1", params![id])
}

/// Insert the sample catalog when no course exists yet
pub fn seed_sample_courses(conn: &Connection) -> Result<usize> {
  if count_courses(conn)? > 0 {
    return Ok(0);
  }

  let samples = sample_courses();
  for draft in &samples {
    insert_course(conn, draft)?;
  }
  tracing::info!("Seeded {} sample courses", samples.len());
  Ok(samples.len())
}

fn sample(
  title: &str,
  description: &str,
  provider: &str,
  instructor: &str,
  price: f64,
  rating: f64,
  difficulty: Difficulty,
  duration: &str,
  category: &str,
) -> CourseDraft {
  CourseDraft {
    title: title.to_string(),
    description: description.to_string(),
    provider: provider.to_string(),
    instructor: Some(instructor.to_string()),
    price: Some(price),
    course_type: CourseType::Paid,
    image_url: None,
    course_url: None,
    rating: Some(rating),
    difficulty: Some(difficulty),
    duration: Some(duration.to_string()),
    category: Some(category.to_string()),
  }
}

fn sample_courses() -> Vec<CourseDraft> {
  vec![
    sample(
      "Python for Data Science",
      "Learn Python programming with focus on data analysis, visualization, and machine learning basics.",
      "Data Science Hub",
      "Dr. Emily Rodriguez",
      79.99,
      4.9,
      Difficulty::Beginner,
      "20 hours",
      "Data Science",
    ),
    sample(
      "Node.js & Express Masterclass",
      "Complete backend development course covering Node.js, Express, databases, and RESTful APIs.",
      "Dev Institute",
      "Mike Chen",
      89.99,
      4.7,
      Difficulty::Intermediate,
      "15 hours",
      "Backend Development",
    ),
    sample(
      "Advanced React Development",
      "Master React with hooks, context, and advanced patterns. Build scalable applications with modern React features.",
      "Tech Academy",
      "Sarah Johnson",
      99.99,
      4.8,
      Difficulty::Advanced,
      "12 hours",
      "Frontend Development",
    ),
  ]
}

fn row_to_course(row: &rusqlite::Row) -> Result<Course> {
  let type_str: String = row.get(6)?;
  let difficulty_str: Option<String> = row.get(10)?;

  Ok(Course {
    id: row.get(0)?,
    title: row.get(1)?,
    description: row.get(2)?,
    provider: row.get(3)?,
    instructor: row.get(4)?,
    price: row.get(5)?,
    course_type: CourseType::from_str(&type_str).unwrap_or_default(),
    image_url: row.get(7)?,
    course_url: row.get(8)?,
    rating: row.get(9)?,
    difficulty: difficulty_str.and_then(|d| Difficulty::from_str(&d)),
    duration: row.get(11)?,
    category: row.get(12)?,
    created_at: parse_timestamp(row, 13)?,
  })
}
