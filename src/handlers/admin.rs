//! Admin panel: course management, admin accounts and achievements.

use askama::Template;
use axum::{
  extract::{Path, Query, State},
  response::{Html, IntoResponse, Redirect, Response},
  Form,
};
use serde::Deserialize;

use super::{redirect_with, Notice, NoticeQuery, SelectOption};
use crate::auth::{self, AdminContext, OptionalAdmin};
use crate::config::MIN_ADMIN_PASSWORD_CHARS;
use crate::domain::{Course, CourseDraft, CourseType, Difficulty};
use crate::filters;
use crate::identity::Visitor;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
  pub visitor: Visitor,
  pub notice: Option<Notice>,
  pub admin_email: String,
  pub courses: Vec<Course>,
  pub backend: &'static str,
  pub admin_error: Option<String>,
  pub achievement_error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/course_form.html")]
pub struct CourseFormTemplate {
  pub visitor: Visitor,
  /// `None` when adding a new course
  pub course_id: Option<i64>,
  pub form: CourseForm,
  pub error: Option<String>,
}

impl CourseFormTemplate {
  pub fn action(&self) -> String {
    match self.course_id {
      Some(id) => format!("/admin/courses/{}", id),
      None => "/admin/courses".to_string(),
    }
  }

  pub fn difficulty_options(&self) -> Vec<SelectOption> {
    SelectOption::list(Difficulty::ALL.iter().map(|d| d.as_str()), &self.form.difficulty)
  }
}

#[derive(Template)]
#[template(path = "admin/delete_confirm.html")]
pub struct DeleteConfirmTemplate {
  pub visitor: Visitor,
  pub course: Course,
}

/// Raw course form; every field arrives as text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseForm {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub provider: String,
  #[serde(default)]
  pub description: String,
  #[serde(default, rename = "type")]
  pub course_type: String,
  #[serde(default)]
  pub instructor: String,
  #[serde(default)]
  pub price: String,
  #[serde(default)]
  pub image_url: String,
  #[serde(default)]
  pub course_url: String,
  #[serde(default)]
  pub rating: String,
  #[serde(default)]
  pub difficulty: String,
  #[serde(default)]
  pub duration: String,
  #[serde(default)]
  pub category: String,
}

fn optional(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn optional_number(value: &str, field: &str, max: Option<f64>) -> Result<Option<f64>, String> {
  let Some(raw) = optional(value) else {
    return Ok(None);
  };
  match raw.parse::<f64>() {
    Ok(n) if n.is_finite() && n >= 0.0 && max.is_none_or(|m| n <= m) => Ok(Some(n)),
    _ => Err(format!("{} must be a non-negative number", field)),
  }
}

fn show(value: &Option<String>) -> String {
  value.clone().unwrap_or_default()
}

fn show_number(value: Option<f64>) -> String {
  value.map(|n| n.to_string()).unwrap_or_default()
}

impl CourseForm {
  pub fn from_course(course: &Course) -> Self {
    let draft = course.to_draft();
    Self {
      title: draft.title,
      provider: draft.provider,
      description: draft.description,
      course_type: draft.course_type.as_str().to_string(),
      instructor: show(&draft.instructor),
      price: show_number(draft.price),
      image_url: show(&draft.image_url),
      course_url: show(&draft.course_url),
      rating: show_number(draft.rating),
      difficulty: draft.difficulty.map(|d| d.as_str().to_string()).unwrap_or_default(),
      duration: show(&draft.duration),
      category: show(&draft.category),
    }
  }

  pub fn is_paid(&self) -> bool {
    self.course_type == CourseType::Paid.as_str()
  }

  /// Validate into a draft; blank optional fields become `None`
  pub fn to_draft(&self) -> Result<CourseDraft, String> {
    let title = self.title.trim();
    let provider = self.provider.trim();
    let description = self.description.trim();
    let course_url = self.course_url.trim();
    if title.is_empty() || provider.is_empty() || description.is_empty() || course_url.is_empty() {
      return Err("Please fill in all required fields".to_string());
    }

    let course_type = CourseType::from_str(self.course_type.trim())
      .ok_or_else(|| "Type must be FREE or PAID".to_string())?;

    let difficulty = match optional(&self.difficulty) {
      Some(raw) => Some(
        Difficulty::from_str(&raw)
          .ok_or_else(|| "Difficulty must be Beginner, Intermediate or Advanced".to_string())?,
      ),
      None => None,
    };

    Ok(CourseDraft {
      title: title.to_string(),
      description: description.to_string(),
      provider: provider.to_string(),
      instructor: optional(&self.instructor),
      price: optional_number(&self.price, "Price", None)?,
      course_type,
      image_url: optional(&self.image_url),
      course_url: Some(course_url.to_string()),
      rating: optional_number(&self.rating, "Rating", Some(5.0))?,
      difficulty,
      duration: optional(&self.duration),
      category: optional(&self.category),
    })
  }
}

fn render_form(visitor: Visitor, course_id: Option<i64>, form: CourseForm, error: Option<String>) -> Response {
  let template = CourseFormTemplate {
    visitor,
    course_id,
    form,
    error,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

async fn render_dashboard(
  state: &AppState,
  visitor: Visitor,
  admin: &AdminContext,
  notice: Option<Notice>,
  admin_error: Option<String>,
  achievement_error: Option<String>,
) -> Response {
  let template = AdminDashboardTemplate {
    visitor,
    notice,
    admin_email: admin.email.clone(),
    courses: state.catalog.get_courses().await,
    backend: state.catalog.store().backend_name(),
    admin_error,
    achievement_error,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// GET /admin - Login form, or the course table once logged in
pub async fn admin_home(
  State(state): State<AppState>,
  visitor: Visitor,
  OptionalAdmin(admin): OptionalAdmin,
  Query(query): Query<NoticeQuery>,
) -> Response {
  match admin {
    Some(admin) => render_dashboard(&state, visitor, &admin, query.notice(), None, None).await,
    None => auth::login_page(visitor, None, "").into_response(),
  }
}

/// POST /admin/test-connection
pub async fn test_connection(State(state): State<AppState>, _admin: AdminContext) -> Redirect {
  if state.catalog.test_connection().await {
    redirect_with("/admin", Notice::ConnectionOk)
  } else {
    redirect_with("/admin", Notice::ConnectionFailed)
  }
}

// ==================== Courses ====================

/// GET /admin/courses/new
pub async fn new_course_form(visitor: Visitor, _admin: AdminContext) -> Response {
  let form = CourseForm {
    course_type: CourseType::Free.as_str().to_string(),
    ..Default::default()
  };
  render_form(visitor, None, form, None)
}

/// GET /admin/courses/{id}/edit
pub async fn edit_course_form(
  State(state): State<AppState>,
  visitor: Visitor,
  _admin: AdminContext,
  Path(id): Path<i64>,
) -> Response {
  match state.catalog.get_course(id).await {
    Some(course) => render_form(visitor, Some(id), CourseForm::from_course(&course), None),
    None => super::courses::not_found(visitor),
  }
}

/// POST /admin/courses
pub async fn create_course(
  State(state): State<AppState>,
  visitor: Visitor,
  _admin: AdminContext,
  Form(form): Form<CourseForm>,
) -> Response {
  let draft = match form.to_draft() {
    Ok(draft) => draft,
    Err(e) => return render_form(visitor, None, form, Some(e)),
  };

  if state.catalog.add_course(&draft).await {
    redirect_with("/admin", Notice::CourseAdded).into_response()
  } else {
    render_form(visitor, None, form, Some("Failed to save course".to_string()))
  }
}

/// POST /admin/courses/{id}
pub async fn update_course(
  State(state): State<AppState>,
  visitor: Visitor,
  _admin: AdminContext,
  Path(id): Path<i64>,
  Form(form): Form<CourseForm>,
) -> Response {
  if state.catalog.get_course(id).await.is_none() {
    return super::courses::not_found(visitor);
  }

  let draft = match form.to_draft() {
    Ok(draft) => draft,
    Err(e) => return render_form(visitor, Some(id), form, Some(e)),
  };

  if state.catalog.update_course(id, &draft).await {
    redirect_with("/admin", Notice::CourseUpdated).into_response()
  } else {
    render_form(visitor, Some(id), form, Some("Failed to save course".to_string()))
  }
}

/// GET /admin/courses/{id}/delete - Confirmation page
pub async fn delete_course_confirm(
  State(state): State<AppState>,
  visitor: Visitor,
  _admin: AdminContext,
  Path(id): Path<i64>,
) -> Response {
  match state.catalog.get_course(id).await {
    Some(course) => {
      let template = DeleteConfirmTemplate { visitor, course };
      Html(template.render().unwrap_or_default()).into_response()
    }
    None => super::courses::not_found(visitor),
  }
}

/// POST /admin/courses/{id}/delete
pub async fn delete_course(
  State(state): State<AppState>,
  _admin: AdminContext,
  Path(id): Path<i64>,
) -> Redirect {
  if state.catalog.delete_course(id).await {
    redirect_with("/admin", Notice::CourseDeleted)
  } else {
    redirect_with("/admin", Notice::DeleteFailed)
  }
}

// ==================== Admin accounts ====================

#[derive(Deserialize)]
pub struct NewAdminForm {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

/// POST /admin/admins
pub async fn create_admin(
  State(state): State<AppState>,
  visitor: Visitor,
  admin: AdminContext,
  Form(form): Form<NewAdminForm>,
) -> Response {
  let email = form.email.trim();
  let error = if email.is_empty() || form.password.is_empty() {
    Some("Please fill in all fields".to_string())
  } else if !email.contains('@') {
    Some("Please enter a valid email address".to_string())
  } else if form.password.chars().count() < MIN_ADMIN_PASSWORD_CHARS {
    Some(format!(
      "Password must be at least {} characters",
      MIN_ADMIN_PASSWORD_CHARS
    ))
  } else {
    None
  };
  if let Some(error) = error {
    return render_dashboard(&state, visitor, &admin, None, Some(error), None).await;
  }

  if state.catalog.create_admin(email, &form.password).await {
    tracing::info!("Admin {} created admin account {}", admin.email, email);
    redirect_with("/admin", Notice::AdminCreated).into_response()
  } else {
    redirect_with("/admin", Notice::AdminFailed).into_response()
  }
}

// ==================== Achievements ====================

#[derive(Deserialize)]
pub struct AchievementForm {
  #[serde(default)]
  pub user_id: String,
  #[serde(default)]
  pub badge_type: String,
  #[serde(default)]
  pub badge_name: String,
  #[serde(default)]
  pub description: String,
}

/// POST /admin/achievements - Award a badge to a learner by display name
pub async fn award_achievement(
  State(state): State<AppState>,
  visitor: Visitor,
  admin: AdminContext,
  Form(form): Form<AchievementForm>,
) -> Response {
  let fields = [
    form.user_id.trim(),
    form.badge_type.trim(),
    form.badge_name.trim(),
    form.description.trim(),
  ];
  if fields.iter().any(|f| f.is_empty()) {
    let error = Some("Please fill in all fields".to_string());
    return render_dashboard(&state, visitor, &admin, None, None, error).await;
  }

  let [user_id, badge_type, badge_name, description] = fields;
  if state
    .catalog
    .award_achievement(user_id, badge_type, badge_name, description)
    .await
  {
    redirect_with("/admin", Notice::AchievementAwarded).into_response()
  } else {
    redirect_with("/admin", Notice::AchievementFailed).into_response()
  }
}
