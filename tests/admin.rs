mod common;

use axum::http::StatusCode;

use certiswift::domain::CourseType;
use common::{location, with_cookie, TestApp, ADMIN_EMAIL};

fn course_form<'a>(title: &'a str, url: &'a str) -> Vec<(&'static str, &'a str)> {
  vec![
    ("title", title),
    ("provider", "Y"),
    ("type", "FREE"),
    ("description", "d"),
    ("course_url", url),
  ]
}

#[tokio::test]
async fn test_admin_shows_login_without_session() {
  let app = TestApp::new().await;
  let html = app.server.get("/admin").await.text();
  assert!(html.contains("Admin Login"));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
  let app = TestApp::new().await;
  let response = app
    .server
    .post("/admin/login")
    .form(&[("email", ADMIN_EMAIL), ("password", "nope")])
    .await;
  response.assert_status_ok();
  assert!(response.text().contains("Invalid email or password"));
  assert!(app.state.sessions.is_empty());
}

#[tokio::test]
async fn test_login_opens_dashboard() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let html = with_cookie(app.server.get("/admin?notice=welcome"), &cookie)
    .await
    .text();
  assert!(html.contains("Admin Panel"));
  assert!(html.contains("Welcome to admin panel!"));
  assert!(html.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn test_create_course_appears_once_in_listing() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let response = with_cookie(app.server.post("/admin/courses"), &cookie)
    .form(&course_form("X", "https://x"))
    .await;
  response.assert_status(StatusCode::SEE_OTHER);
  assert_eq!(location(&response), "/admin?notice=course-added");

  let courses = app.state.catalog.get_courses().await;
  let matching: Vec<_> = courses.iter().filter(|c| c.title == "X").collect();
  assert_eq!(matching.len(), 1);
  assert_eq!(matching[0].course_type, CourseType::Free);
  assert_eq!(matching[0].course_url.as_deref(), Some("https://x"));
}

#[tokio::test]
async fn test_missing_required_fields_keep_form() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let response = with_cookie(app.server.post("/admin/courses"), &cookie)
    .form(&course_form("Half done", ""))
    .await;
  response.assert_status_ok();
  let html = response.text();
  assert!(html.contains("Please fill in all required fields"));
  assert!(html.contains("Half done"));
  assert!(app.state.catalog.get_courses().await.is_empty());
}

#[tokio::test]
async fn test_edit_course_updates_fields() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;
  let id = app.add_course("Old title").await;

  let form_page = with_cookie(app.server.get(&format!("/admin/courses/{}/edit", id)), &cookie)
    .await
    .text();
  assert!(form_page.contains("Old title"));

  let response = with_cookie(app.server.post(&format!("/admin/courses/{}", id)), &cookie)
    .form(&course_form("New title", "https://new"))
    .await;
  assert_eq!(location(&response), "/admin?notice=course-updated");
  assert_eq!(app.state.catalog.get_course(id).await.unwrap().title, "New title");
}

#[tokio::test]
async fn test_edit_missing_course_is_not_found() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let response = with_cookie(app.server.post("/admin/courses/999999"), &cookie)
    .form(&course_form("Ghost", "https://ghost"))
    .await;
  response.assert_status(StatusCode::NOT_FOUND);
  assert!(app.state.catalog.get_courses().await.is_empty());
}

#[tokio::test]
async fn test_mutations_require_session() {
  let app = TestApp::new().await;
  let response = app
    .server
    .post("/admin/courses")
    .form(&course_form("X", "https://x"))
    .await;
  response.assert_status(StatusCode::SEE_OTHER);
  assert_eq!(location(&response), "/admin");
  assert!(app.state.catalog.get_courses().await.is_empty());
}

#[tokio::test]
async fn test_delete_confirms_then_removes() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;
  let id = app.add_course("Doomed").await;
  let path = format!("/admin/courses/{}/delete", id);

  let confirm = with_cookie(app.server.get(&path), &cookie).await.text();
  assert!(confirm.contains("Are you sure"));
  assert!(app.state.catalog.get_course(id).await.is_some());

  let response = with_cookie(app.server.post(&path), &cookie).await;
  assert_eq!(location(&response), "/admin?notice=course-deleted");
  assert!(app.state.catalog.get_course(id).await.is_none());
}

#[tokio::test]
async fn test_delete_missing_course_reports_success() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let response = with_cookie(app.server.post("/admin/courses/999999/delete"), &cookie).await;
  assert_eq!(location(&response), "/admin?notice=course-deleted");
}

#[tokio::test]
async fn test_logout_ends_session() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;
  assert_eq!(app.state.sessions.len(), 1);

  let response = with_cookie(app.server.post("/admin/logout"), &cookie).await;
  assert_eq!(location(&response), "/admin");
  assert!(app.state.sessions.is_empty());

  let html = with_cookie(app.server.get("/admin"), &cookie).await.text();
  assert!(html.contains("Admin Login"));
}

#[tokio::test]
async fn test_create_admin_enforces_password_length() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let short = with_cookie(app.server.post("/admin/admins"), &cookie)
    .form(&[("email", "second@example.com"), ("password", "short")])
    .await;
  short.assert_status_ok();
  assert!(short.text().contains("Password must be at least 8 characters"));

  let ok = with_cookie(app.server.post("/admin/admins"), &cookie)
    .form(&[("email", "second@example.com"), ("password", "long-enough")])
    .await;
  assert_eq!(location(&ok), "/admin?notice=admin-created");

  let login = app
    .server
    .post("/admin/login")
    .form(&[("email", "Second@Example.com"), ("password", "long-enough")])
    .await;
  assert_eq!(location(&login), "/admin?notice=welcome");
}

#[tokio::test]
async fn test_award_achievement() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let response = with_cookie(app.server.post("/admin/achievements"), &cookie)
    .form(&[
      ("user_id", "Ana"),
      ("badge_type", "completion"),
      ("badge_name", "Finisher"),
      ("description", "Completed a course"),
    ])
    .await;
  assert_eq!(location(&response), "/admin?notice=achievement-awarded");

  let earned = app.state.catalog.get_user_achievements("Ana").await;
  assert_eq!(earned.len(), 1);
  assert_eq!(earned[0].badge_name, "Finisher");
}

#[tokio::test]
async fn test_connection_check() {
  let app = TestApp::new().await;
  let cookie = app.admin_cookie().await;

  let response = with_cookie(app.server.post("/admin/test-connection"), &cookie).await;
  assert_eq!(location(&response), "/admin?notice=connection-ok");
}
