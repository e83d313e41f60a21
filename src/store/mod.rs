//! Repository interface over the six catalog tables.
//!
//! Handlers never talk to a concrete backend: they go through
//! [`crate::catalog::Catalog`], which holds an `Arc<dyn CatalogStore>`.

pub mod rest;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::DbLockError;
use crate::domain::{
  Achievement, AdminRecord, Course, CourseDraft, CourseProgress, CourseRating, FavoriteState,
  NewAchievement, NewAdmin, NewRating, ProgressUpdate,
};

pub use rest::RestStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("{0}")]
  Unavailable(#[from] DbLockError),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("backend returned {status}: {message}")]
  Remote { status: u16, message: String },

  #[error("unexpected response: {0}")]
  Decode(String),

  #[error("store misconfigured: {0}")]
  Config(String),
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// Short backend name for diagnostics
  fn backend_name(&self) -> &'static str;

  async fn count_courses(&self) -> StoreResult<i64>;
  async fn list_courses(&self) -> StoreResult<Vec<Course>>;
  async fn get_course(&self, id: i64) -> StoreResult<Option<Course>>;
  /// Returns the generated id
  async fn insert_course(&self, draft: &CourseDraft) -> StoreResult<i64>;
  /// Returns rows affected
  async fn update_course(&self, id: i64, draft: &CourseDraft) -> StoreResult<u64>;
  /// Returns rows affected; a missing id is not an error
  async fn delete_course(&self, id: i64) -> StoreResult<u64>;

  async fn find_admin(&self, email: &str) -> StoreResult<Option<AdminRecord>>;
  async fn insert_admin(&self, admin: &NewAdmin) -> StoreResult<()>;
  async fn count_admins(&self) -> StoreResult<i64>;

  async fn upsert_progress(&self, update: &ProgressUpdate) -> StoreResult<()>;
  async fn list_progress(&self, user_id: &str) -> StoreResult<Vec<CourseProgress>>;

  async fn insert_rating(&self, rating: &NewRating) -> StoreResult<()>;
  async fn list_ratings(&self, course_id: i64) -> StoreResult<Vec<CourseRating>>;

  /// Delete-if-present else insert, without a client-side read first
  async fn toggle_favorite(&self, user_id: &str, course_id: i64) -> StoreResult<FavoriteState>;
  async fn list_favorites(&self, user_id: &str) -> StoreResult<Vec<i64>>;

  async fn insert_achievement(&self, achievement: &NewAchievement) -> StoreResult<()>;
  async fn list_achievements(&self, user_id: &str) -> StoreResult<Vec<Achievement>>;
}
