use askama::Template;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
  Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::{redirect_with, Notice, NoticeQuery};
use crate::config::{COURSE_TOTAL_MODULES, DEFAULT_PROGRESS_INCREMENT};
use crate::domain::rating::{MAX_STARS, MIN_STARS};
use crate::domain::{
  Course, CourseFilter, CourseRating, CourseType, NewRating, ProgressStatus, ProgressTracker,
  RatingSummary,
};
use crate::filters;
use crate::identity::{self, Visitor};
use crate::state::AppState;

// ==================== Listing ====================

#[derive(Template)]
#[template(path = "courses.html")]
pub struct CoursesTemplate {
  pub visitor: Visitor,
  pub courses: Vec<Course>,
  pub total: usize,
  pub query: String,
  /// "all", "FREE" or "PAID"
  pub type_filter: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoursesQuery {
  #[serde(default)]
  pub q: String,
  #[serde(default, rename = "type")]
  pub course_type: Option<String>,
}

pub async fn courses(
  State(state): State<AppState>,
  visitor: Visitor,
  Query(params): Query<CoursesQuery>,
) -> Html<String> {
  let all = state.catalog.get_courses().await;
  let course_type = params.course_type.as_deref().and_then(CourseType::from_str);
  let filtered = CourseFilter::new(&params.q, course_type).apply(&all);

  let template = CoursesTemplate {
    visitor,
    courses: filtered,
    total: all.len(),
    query: params.q.trim().to_string(),
    type_filter: course_type.map(|t| t.as_str()).unwrap_or("all").to_string(),
  };
  Html(template.render().unwrap_or_default())
}

// ==================== Detail ====================

/// Tracker panel values, precomputed for the template
pub struct TrackerView {
  pub started: bool,
  pub percentage: i64,
  pub completed: bool,
  pub status: ProgressStatus,
  pub completed_modules: u32,
  pub total_modules: u32,
  pub hours_remaining: Option<u32>,
  pub last_accessed: Option<String>,
}

impl TrackerView {
  fn build(tracker: ProgressTracker, started: bool, last_accessed: Option<String>) -> Self {
    Self {
      started,
      percentage: tracker.rounded(),
      completed: tracker.completed(),
      status: tracker.status(started),
      completed_modules: tracker.completed_modules(COURSE_TOTAL_MODULES),
      total_modules: COURSE_TOTAL_MODULES,
      hours_remaining: if started { tracker.estimated_hours_remaining() } else { None },
      last_accessed,
    }
  }
}

#[derive(Template)]
#[template(path = "course_detail.html")]
pub struct CourseDetailTemplate {
  pub visitor: Visitor,
  pub notice: Option<Notice>,
  pub course: Course,
  pub ratings: Vec<CourseRating>,
  pub summary: RatingSummary,
  pub is_favorite: bool,
  pub tracker: TrackerView,
  pub rating_error: Option<String>,
  pub rating_form: RatingForm,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
  pub visitor: Visitor,
}

pub fn not_found(visitor: Visitor) -> Response {
  let template = NotFoundTemplate { visitor };
  (StatusCode::NOT_FOUND, Html(template.render().unwrap_or_default())).into_response()
}

async fn render_detail(
  state: &AppState,
  visitor: Visitor,
  id: i64,
  notice: Option<Notice>,
  rating_error: Option<String>,
  rating_form: RatingForm,
) -> Response {
  let Some(course) = state.catalog.get_course(id).await else {
    return not_found(visitor);
  };

  let ratings = state.catalog.get_course_ratings(id).await;
  let summary = RatingSummary::from_ratings(&ratings);

  let (tracker, is_favorite) = match visitor.name() {
    Some(name) => {
      let progress = state.catalog.get_user_progress(name).await;
      let row = progress.iter().find(|p| p.course_id == id);
      let last_accessed = row
        .and_then(|p| p.last_accessed)
        .map(|t| t.format("%b %-d, %Y").to_string());
      let tracker = TrackerView::build(ProgressTracker::from_progress(row), row.is_some(), last_accessed);
      (tracker, state.catalog.is_favorite(name, id).await)
    }
    None => (TrackerView::build(ProgressTracker::default(), false, None), false),
  };

  let rating_form = RatingForm {
    user_name: if rating_form.user_name.is_empty() {
      visitor.name().unwrap_or_default().to_string()
    } else {
      rating_form.user_name
    },
    ..rating_form
  };

  let template = CourseDetailTemplate {
    visitor,
    notice,
    course,
    ratings,
    summary,
    is_favorite,
    tracker,
    rating_error,
    rating_form,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

pub async fn course_detail(
  State(state): State<AppState>,
  visitor: Visitor,
  Path(id): Path<i64>,
  Query(query): Query<NoticeQuery>,
) -> Response {
  render_detail(&state, visitor, id, query.notice(), None, RatingForm::default()).await
}

// ==================== Favorites ====================

/// POST /courses/{id}/favorite
pub async fn toggle_favorite(
  State(state): State<AppState>,
  visitor: Visitor,
  Path(id): Path<i64>,
) -> Response {
  let path = format!("/courses/{}", id);
  let Some(name) = visitor.name() else {
    return redirect_with(&path, Notice::NameRequired).into_response();
  };

  let notice = match state.catalog.toggle_favorite(name, id).await {
    Some(favorite) if favorite.is_favorite() => Notice::FavoriteAdded,
    Some(_) => Notice::FavoriteRemoved,
    None => Notice::FavoriteFailed,
  };
  redirect_with(&path, notice).into_response()
}

// ==================== Progress ====================

#[derive(Debug, Deserialize)]
pub struct ProgressForm {
  pub action: String,
  #[serde(default)]
  pub increment: Option<f64>,
  /// Name typed into the "start tracking" form
  #[serde(default)]
  pub user_name: Option<String>,
}

/// POST /courses/{id}/progress - start, complete a module, or add a flat increment
pub async fn update_progress(
  State(state): State<AppState>,
  visitor: Visitor,
  jar: CookieJar,
  Path(id): Path<i64>,
  Form(form): Form<ProgressForm>,
) -> Response {
  let path = format!("/courses/{}", id);

  let typed = form.user_name.as_deref().and_then(identity::clean_display_name);
  let (jar, name) = match typed {
    Some(name) => (identity::set_display_name(jar, &name), name),
    None => match visitor.name {
      Some(name) => (jar, name),
      None => return redirect_with(&path, Notice::NameRequired).into_response(),
    },
  };

  let progress = state.catalog.get_user_progress(&name).await;
  let row = progress.iter().find(|p| p.course_id == id);
  let current = ProgressTracker::from_progress(row);

  let next = match form.action.as_str() {
    // Starting never resets an existing row
    "start" if row.is_some() => None,
    "start" => Some(current),
    "module" => Some(current.complete_module(COURSE_TOTAL_MODULES)),
    "add" => match form.increment.unwrap_or(DEFAULT_PROGRESS_INCREMENT) {
      step if step.is_finite() && step > 0.0 => Some(current.add(step)),
      step => {
        tracing::debug!("Rejecting progress increment {}", step);
        return (jar, redirect_with(&path, Notice::ProgressFailed)).into_response();
      }
    },
    other => {
      tracing::debug!("Ignoring unknown progress action '{}'", other);
      return (jar, redirect_with(&path, Notice::ProgressFailed)).into_response();
    }
  };

  let notice = match next {
    None => Notice::ProgressUpdated,
    Some(tracker) => {
      if state
        .catalog
        .update_course_progress(&name, id, tracker.percentage())
        .await
      {
        Notice::ProgressUpdated
      } else {
        Notice::ProgressFailed
      }
    }
  };

  (jar, redirect_with(&path, notice)).into_response()
}

// ==================== Ratings ====================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingForm {
  #[serde(default)]
  pub user_name: String,
  /// Kept as text so a missing star choice reaches validation
  #[serde(default)]
  pub rating: String,
  #[serde(default)]
  pub review: String,
}

impl RatingForm {
  fn stars(&self) -> u8 {
    self.rating.trim().parse().unwrap_or(0)
  }

  /// Radio choices 1 to 5, keeping the previous pick on a re-rendered form
  pub fn star_choices(&self) -> Vec<StarChoice> {
    let picked = self.stars();
    (MIN_STARS..=MAX_STARS)
      .map(|value| StarChoice {
        value,
        selected: value == picked,
      })
      .collect()
  }
}

pub struct StarChoice {
  pub value: u8,
  pub selected: bool,
}

/// POST /courses/{id}/ratings
pub async fn add_rating(
  State(state): State<AppState>,
  visitor: Visitor,
  Path(id): Path<i64>,
  Form(form): Form<RatingForm>,
) -> Response {
  let review = Some(form.review.as_str());
  if let Err(e) = NewRating::new(id, &form.user_name, form.stars(), review) {
    return render_detail(&state, visitor, id, None, Some(e.to_string()), form).await;
  }

  if state.catalog.get_course(id).await.is_none() {
    return not_found(visitor);
  }

  let notice = if state
    .catalog
    .add_course_rating(id, &form.user_name, form.stars(), review)
    .await
  {
    Notice::RatingAdded
  } else {
    Notice::RatingFailed
  };
  redirect_with(&format!("/courses/{}", id), notice).into_response()
}
