//! Data-access facade used by every page.
//!
//! One method per catalog operation. Nothing here fails outward: mutations
//! report `bool`, reads return a possibly-empty collection, and the cause of
//! any failure is logged on the way through [`LogOnError`].

use std::sync::Arc;

use crate::auth::password;
use crate::db::LogOnError;
use crate::domain::{
  Achievement, Course, CourseDraft, CourseProgress, CourseRating, FavoriteState, NewAchievement,
  NewAdmin, NewRating, ProgressUpdate,
};
use crate::store::CatalogStore;

#[derive(Clone)]
pub struct Catalog {
  store: Arc<dyn CatalogStore>,
}

impl Catalog {
  pub fn new(store: Arc<dyn CatalogStore>) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &Arc<dyn CatalogStore> {
    &self.store
  }

  pub async fn test_connection(&self) -> bool {
    match self.store.count_courses().await {
      Ok(count) => {
        tracing::info!(
          "Connected to {} store ({} courses)",
          self.store.backend_name(),
          count
        );
        true
      }
      Err(e) => {
        tracing::error!("Store connection test failed: {}", e);
        false
      }
    }
  }

  // ==================== Courses ====================

  /// Newest first
  pub async fn get_courses(&self) -> Vec<Course> {
    self
      .store
      .list_courses()
      .await
      .log_warn_default("Failed to fetch courses")
  }

  pub async fn get_course(&self, id: i64) -> Option<Course> {
    self
      .store
      .get_course(id)
      .await
      .log_warn(&format!("Failed to fetch course {}", id))
      .flatten()
  }

  pub async fn add_course(&self, draft: &CourseDraft) -> bool {
    let added = self
      .store
      .insert_course(draft)
      .await
      .log_warn("Failed to add course");
    if let Some(id) = added {
      tracing::info!("Added course {} ({})", id, draft.title);
    }
    added.is_some()
  }

  /// `false` when the store failed or no course has this id
  pub async fn update_course(&self, id: i64, draft: &CourseDraft) -> bool {
    let rows = self
      .store
      .update_course(id, draft)
      .await
      .log_warn(&format!("Failed to update course {}", id));
    if rows == Some(0) {
      tracing::debug!("Update of course {} matched no rows", id);
    }
    rows.is_some_and(|rows| rows > 0)
  }

  /// Zero rows affected still counts as success.
  pub async fn delete_course(&self, id: i64) -> bool {
    match self.store.delete_course(id).await {
      Ok(rows) => {
        if rows == 0 {
          tracing::debug!("Delete of course {} matched no rows", id);
        }
        true
      }
      Err(e) => {
        tracing::warn!("Failed to delete course {}: {}", id, e);
        false
      }
    }
  }

  // ==================== Admins ====================

  /// Hashes the password before it reaches the store.
  pub async fn create_admin(&self, email: &str, plaintext: &str) -> bool {
    let Some(hash) = password::hash_password(plaintext).log_warn("Failed to hash admin password")
    else {
      return false;
    };
    let admin = NewAdmin {
      email: email.trim().to_lowercase(),
      password: hash,
    };
    self
      .store
      .insert_admin(&admin)
      .await
      .log_warn("Failed to create admin")
      .is_some()
  }

  /// Create the first admin when none exist yet. Returns whether one was created.
  pub async fn bootstrap_admin(&self, email: &str, plaintext: &str) -> bool {
    match self.store.count_admins().await {
      Ok(0) => {
        let created = self.create_admin(email, plaintext).await;
        if created {
          tracing::info!("Created bootstrap admin {}", email.trim().to_lowercase());
        }
        created
      }
      Ok(_) => false,
      Err(e) => {
        tracing::warn!("Could not count admins: {}", e);
        false
      }
    }
  }

  // ==================== Progress ====================

  pub async fn update_course_progress(&self, user_id: &str, course_id: i64, percentage: f64) -> bool {
    let update = ProgressUpdate::new(user_id, course_id, percentage);
    self
      .store
      .upsert_progress(&update)
      .await
      .log_warn("Failed to update course progress")
      .is_some()
  }

  pub async fn get_user_progress(&self, user_id: &str) -> Vec<CourseProgress> {
    self
      .store
      .list_progress(user_id)
      .await
      .log_warn_default("Failed to fetch user progress")
  }

  // ==================== Ratings ====================

  pub async fn add_course_rating(
    &self,
    course_id: i64,
    user_name: &str,
    rating: u8,
    review: Option<&str>,
  ) -> bool {
    let Some(new_rating) =
      NewRating::new(course_id, user_name, rating, review).log_warn("Rejected course rating")
    else {
      return false;
    };
    self
      .store
      .insert_rating(&new_rating)
      .await
      .log_warn("Failed to add course rating")
      .is_some()
  }

  /// Newest first
  pub async fn get_course_ratings(&self, course_id: i64) -> Vec<CourseRating> {
    self
      .store
      .list_ratings(course_id)
      .await
      .log_warn_default("Failed to fetch course ratings")
  }

  // ==================== Favorites ====================

  /// The membership after the toggle, `None` when the store failed
  pub async fn toggle_favorite(&self, user_id: &str, course_id: i64) -> Option<FavoriteState> {
    let state = self
      .store
      .toggle_favorite(user_id, course_id)
      .await
      .log_warn("Failed to toggle favorite")?;
    tracing::debug!("Favorite {} for {} -> {:?}", course_id, user_id, state);
    Some(state)
  }

  pub async fn is_favorite(&self, user_id: &str, course_id: i64) -> bool {
    self.get_user_favorites(user_id).await.contains(&course_id)
  }

  pub async fn get_user_favorites(&self, user_id: &str) -> Vec<i64> {
    self
      .store
      .list_favorites(user_id)
      .await
      .log_warn_default("Failed to fetch user favorites")
  }

  // ==================== Achievements ====================

  pub async fn award_achievement(
    &self,
    user_id: &str,
    badge_type: &str,
    badge_name: &str,
    description: &str,
  ) -> bool {
    let achievement = NewAchievement {
      user_id: user_id.to_string(),
      badge_type: badge_type.to_string(),
      badge_name: badge_name.to_string(),
      description: description.to_string(),
    };
    self
      .store
      .insert_achievement(&achievement)
      .await
      .log_warn("Failed to award achievement")
      .is_some()
  }

  pub async fn get_user_achievements(&self, user_id: &str) -> Vec<Achievement> {
    self
      .store
      .list_achievements(user_id)
      .await
      .log_warn_default("Failed to fetch achievements")
  }
}
