pub mod admin;
pub mod courses;
pub mod dashboard;
pub mod support;

use askama::Template;
use axum::{
  extract::{Query, State},
  response::{Html, IntoResponse, Redirect},
  Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::domain::{Course, CourseType};
use crate::filters;
use crate::identity::{self, Visitor};
use crate::state::AppState;

/// One-shot message shown after a post/redirect/get round trip.
///
/// Carried as `?notice=<key>` so the page stays a plain GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
  Welcome,
  ConnectionOk,
  ConnectionFailed,
  CourseAdded,
  CourseUpdated,
  CourseDeleted,
  DeleteFailed,
  AdminCreated,
  AdminFailed,
  AchievementAwarded,
  AchievementFailed,
  ProgressUpdated,
  ProgressFailed,
  FavoriteAdded,
  FavoriteRemoved,
  FavoriteFailed,
  NameRequired,
  RatingAdded,
  RatingFailed,
  NameSaved,
  NameCleared,
  SupportSent,
}

impl Notice {
  const ALL: [Notice; 22] = [
    Self::Welcome,
    Self::ConnectionOk,
    Self::ConnectionFailed,
    Self::CourseAdded,
    Self::CourseUpdated,
    Self::CourseDeleted,
    Self::DeleteFailed,
    Self::AdminCreated,
    Self::AdminFailed,
    Self::AchievementAwarded,
    Self::AchievementFailed,
    Self::ProgressUpdated,
    Self::ProgressFailed,
    Self::FavoriteAdded,
    Self::FavoriteRemoved,
    Self::FavoriteFailed,
    Self::NameRequired,
    Self::RatingAdded,
    Self::RatingFailed,
    Self::NameSaved,
    Self::NameCleared,
    Self::SupportSent,
  ];

  pub fn from_str(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|n| n.as_str() == s)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Welcome => "welcome",
      Self::ConnectionOk => "connection-ok",
      Self::ConnectionFailed => "connection-failed",
      Self::CourseAdded => "course-added",
      Self::CourseUpdated => "course-updated",
      Self::CourseDeleted => "course-deleted",
      Self::DeleteFailed => "delete-failed",
      Self::AdminCreated => "admin-created",
      Self::AdminFailed => "admin-failed",
      Self::AchievementAwarded => "achievement-awarded",
      Self::AchievementFailed => "achievement-failed",
      Self::ProgressUpdated => "progress-updated",
      Self::ProgressFailed => "progress-failed",
      Self::FavoriteAdded => "favorite-added",
      Self::FavoriteRemoved => "favorite-removed",
      Self::FavoriteFailed => "favorite-failed",
      Self::NameRequired => "name-required",
      Self::RatingAdded => "rating-added",
      Self::RatingFailed => "rating-failed",
      Self::NameSaved => "name-saved",
      Self::NameCleared => "name-cleared",
      Self::SupportSent => "support-sent",
    }
  }

  pub fn message(&self) -> &'static str {
    match self {
      Self::Welcome => "Welcome to admin panel!",
      Self::ConnectionOk => "Database connection successful!",
      Self::ConnectionFailed => "Database connection failed! Check the server log for details.",
      Self::CourseAdded => "Course added successfully!",
      Self::CourseUpdated => "Course updated successfully!",
      Self::CourseDeleted => "Course deleted successfully!",
      Self::DeleteFailed => "Failed to delete course",
      Self::AdminCreated => "Admin account created successfully!",
      Self::AdminFailed => "Failed to create admin account",
      Self::AchievementAwarded => "Achievement awarded!",
      Self::AchievementFailed => "Failed to award achievement",
      Self::ProgressUpdated => "Progress updated! 🎯",
      Self::ProgressFailed => "Failed to update progress",
      Self::FavoriteAdded => "Added to favorites! ❤️",
      Self::FavoriteRemoved => "Removed from favorites",
      Self::FavoriteFailed => "Failed to update favorites",
      Self::NameRequired => "Please enter your name to start tracking",
      Self::RatingAdded => "Thank you for your review! 🌟",
      Self::RatingFailed => "Failed to submit review. Please try again.",
      Self::NameSaved => "Name saved",
      Self::NameCleared => "Name cleared",
      Self::SupportSent => "Support request sent successfully! We'll get back to you soon.",
    }
  }

  pub fn is_error(&self) -> bool {
    matches!(
      self,
      Self::ConnectionFailed
        | Self::DeleteFailed
        | Self::AdminFailed
        | Self::AchievementFailed
        | Self::ProgressFailed
        | Self::FavoriteFailed
        | Self::NameRequired
        | Self::RatingFailed
    )
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
  #[serde(default)]
  pub notice: Option<String>,
}

impl NoticeQuery {
  pub fn notice(&self) -> Option<Notice> {
    self.notice.as_deref().and_then(Notice::from_str)
  }
}

/// One `<option>` of a select that keeps its previous choice
pub struct SelectOption {
  pub value: &'static str,
  pub selected: bool,
}

impl SelectOption {
  pub fn list(values: impl IntoIterator<Item = &'static str>, current: &str) -> Vec<Self> {
    values
      .into_iter()
      .map(|value| Self {
        value,
        selected: value == current,
      })
      .collect()
  }
}

/// Redirect to `path` carrying a notice
pub fn redirect_with(path: &str, notice: Notice) -> Redirect {
  let sep = if path.contains('?') { '&' } else { '?' };
  Redirect::to(&format!("{}{}notice={}", path, sep, notice.as_str()))
}

/// Only same-site absolute paths are followed after a form post
pub fn safe_return_path(raw: Option<&str>) -> &str {
  match raw {
    Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
    _ => "/",
  }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub visitor: Visitor,
  pub notice: Option<Notice>,
  pub total_courses: usize,
  pub free_courses: usize,
  pub paid_courses: usize,
  pub latest: Vec<Course>,
}

/// Number of newest courses featured on the landing page
const LATEST_COURSES: usize = 3;

pub async fn index(
  State(state): State<AppState>,
  visitor: Visitor,
  Query(query): Query<NoticeQuery>,
) -> Html<String> {
  let courses = state.catalog.get_courses().await;
  let free_courses = courses
    .iter()
    .filter(|c| c.course_type == CourseType::Free)
    .count();

  let template = IndexTemplate {
    visitor,
    notice: query.notice(),
    total_courses: courses.len(),
    free_courses,
    paid_courses: courses.len() - free_courses,
    latest: courses.into_iter().take(LATEST_COURSES).collect(),
  };
  Html(template.render().unwrap_or_default())
}

#[derive(Template)]
#[template(path = "info.html")]
pub struct InfoTemplate {
  pub visitor: Visitor,
  pub version: &'static str,
}

pub async fn info(visitor: Visitor) -> Html<String> {
  let template = InfoTemplate {
    visitor,
    version: env!("CARGO_PKG_VERSION"),
  };
  Html(template.render().unwrap_or_default())
}

#[derive(Deserialize)]
pub struct IdentityForm {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub return_to: Option<String>,
}

/// POST /identity - Set or clear the visitor display name
pub async fn set_identity(jar: CookieJar, Form(form): Form<IdentityForm>) -> impl IntoResponse {
  let cleared = identity::clean_display_name(&form.name).is_none();
  let jar = identity::set_display_name(jar, &form.name);
  let notice = if cleared { Notice::NameCleared } else { Notice::NameSaved };
  let path = safe_return_path(form.return_to.as_deref()).to_string();
  (jar, redirect_with(&path, notice))
}

pub use admin::{
  admin_home, award_achievement, create_admin, create_course, delete_course, delete_course_confirm,
  edit_course_form, new_course_form, test_connection, update_course,
};
pub use courses::{add_rating, course_detail, courses, toggle_favorite, update_progress};
pub use dashboard::dashboard;
pub use support::{support_page, support_submit};
