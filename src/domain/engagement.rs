//! Favorites, achievements and admin account rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership after a favorite toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
  Added,
  Removed,
}

impl FavoriteState {
  pub fn is_favorite(&self) -> bool {
    matches!(self, Self::Added)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
  pub id: i64,
  pub user_id: String,
  pub badge_type: String,
  pub badge_name: String,
  pub description: String,
  pub earned_at: DateTime<Utc>,
}

impl Achievement {
  pub fn earned_label(&self) -> String {
    self.earned_at.format("%b %-d, %Y").to_string()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAchievement {
  pub user_id: String,
  pub badge_type: String,
  pub badge_name: String,
  pub description: String,
}

/// Admin row. `password` holds an argon2 PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRecord {
  pub id: i64,
  pub email: String,
  pub password: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAdmin {
  pub email: String,
  pub password: String,
}
