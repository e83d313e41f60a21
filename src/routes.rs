//! HTTP routes.

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth;
use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(handlers::index))
    .route("/info", get(handlers::info))
    .route("/identity", post(handlers::set_identity))
    .route("/courses", get(handlers::courses))
    .route("/courses/{id}", get(handlers::course_detail))
    .route("/courses/{id}/favorite", post(handlers::toggle_favorite))
    .route("/courses/{id}/progress", post(handlers::update_progress))
    .route("/courses/{id}/ratings", post(handlers::add_rating))
    .route("/dashboard", get(handlers::dashboard))
    .route("/support", get(handlers::support_page).post(handlers::support_submit))
    .merge(admin_routes())
    .nest_service("/static", ServeDir::new("static"))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn admin_routes() -> Router<AppState> {
  Router::new()
    .route("/admin", get(handlers::admin_home))
    .route("/admin/login", post(auth::login_submit))
    .route("/admin/logout", post(auth::logout))
    .route("/admin/test-connection", post(handlers::test_connection))
    .route("/admin/courses", post(handlers::create_course))
    .route("/admin/courses/new", get(handlers::new_course_form))
    .route("/admin/courses/{id}", post(handlers::update_course))
    .route("/admin/courses/{id}/edit", get(handlers::edit_course_form))
    .route(
      "/admin/courses/{id}/delete",
      get(handlers::delete_course_confirm).post(handlers::delete_course),
    )
    .route("/admin/admins", post(handlers::create_admin))
    .route("/admin/achievements", post(handlers::award_achievement))
}
