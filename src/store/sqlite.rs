//! Embedded backend on a single shared rusqlite connection.

use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;

use super::{CatalogStore, StoreResult};
use crate::db::{self, try_lock, DbPool};
use crate::domain::{
  Achievement, AdminRecord, Course, CourseDraft, CourseProgress, CourseRating, FavoriteState,
  NewAchievement, NewAdmin, NewRating, ProgressUpdate,
};

#[derive(Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Open (creating and migrating if needed) the database file
  pub fn open(path: &Path) -> StoreResult<Self> {
    Ok(Self::new(db::init_db(path)?))
  }

  pub fn open_in_memory() -> StoreResult<Self> {
    Ok(Self::new(db::init_memory_db()?))
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  pub fn seed_sample_courses(&self) -> StoreResult<usize> {
    self.with_conn(db::seed_sample_courses)
  }

  fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> StoreResult<T> {
    let conn = try_lock(&self.pool)?;
    Ok(f(&conn)?)
  }
}

#[async_trait]
impl CatalogStore for SqliteStore {
  fn backend_name(&self) -> &'static str {
    "sqlite"
  }

  async fn count_courses(&self) -> StoreResult<i64> {
    self.with_conn(db::count_courses)
  }

  async fn list_courses(&self) -> StoreResult<Vec<Course>> {
    self.with_conn(db::get_courses)
  }

  async fn get_course(&self, id: i64) -> StoreResult<Option<Course>> {
    self.with_conn(|conn| db::get_course_by_id(conn, id))
  }

  async fn insert_course(&self, draft: &CourseDraft) -> StoreResult<i64> {
    self.with_conn(|conn| db::insert_course(conn, draft))
  }

  async fn update_course(&self, id: i64, draft: &CourseDraft) -> StoreResult<u64> {
    self.with_conn(|conn| db::update_course(conn, id, draft).map(|n| n as u64))
  }

  async fn delete_course(&self, id: i64) -> StoreResult<u64> {
    self.with_conn(|conn| db::delete_course(conn, id).map(|n| n as u64))
  }

  async fn find_admin(&self, email: &str) -> StoreResult<Option<AdminRecord>> {
    self.with_conn(|conn| db::get_admin_by_email(conn, email))
  }

  async fn insert_admin(&self, admin: &NewAdmin) -> StoreResult<()> {
    self.with_conn(|conn| db::create_admin(conn, &admin.email, &admin.password).map(|_| ()))
  }

  async fn count_admins(&self) -> StoreResult<i64> {
    self.with_conn(db::count_admins)
  }

  async fn upsert_progress(&self, update: &ProgressUpdate) -> StoreResult<()> {
    self.with_conn(|conn| db::upsert_progress(conn, update))
  }

  async fn list_progress(&self, user_id: &str) -> StoreResult<Vec<CourseProgress>> {
    self.with_conn(|conn| db::get_user_progress(conn, user_id))
  }

  async fn insert_rating(&self, rating: &NewRating) -> StoreResult<()> {
    self.with_conn(|conn| db::insert_rating(conn, rating).map(|_| ()))
  }

  async fn list_ratings(&self, course_id: i64) -> StoreResult<Vec<CourseRating>> {
    self.with_conn(|conn| db::get_course_ratings(conn, course_id))
  }

  async fn toggle_favorite(&self, user_id: &str, course_id: i64) -> StoreResult<FavoriteState> {
    self.with_conn(|conn| db::toggle_favorite(conn, user_id, course_id))
  }

  async fn list_favorites(&self, user_id: &str) -> StoreResult<Vec<i64>> {
    self.with_conn(|conn| db::get_user_favorites(conn, user_id))
  }

  async fn insert_achievement(&self, achievement: &NewAchievement) -> StoreResult<()> {
    self.with_conn(|conn| db::award_achievement(conn, achievement).map(|_| ()))
  }

  async fn list_achievements(&self, user_id: &str) -> StoreResult<Vec<Achievement>> {
    self.with_conn(|conn| db::get_user_achievements(conn, user_id))
  }
}
