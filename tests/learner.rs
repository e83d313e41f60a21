mod common;

use axum::http::StatusCode;

use common::{location, with_cookie, TestApp};

#[tokio::test]
async fn test_listing_search_and_type_filter() {
  let app = TestApp::new().await;
  app.add_course("Rust Basics").await;
  app.add_course("Python Deep Dive").await;

  let page = app.server.get("/courses").add_query_param("q", "RUST").await;
  page.assert_status_ok();
  let html = page.text();
  assert!(html.contains("Rust Basics"));
  assert!(!html.contains("Python Deep Dive"));
  assert!(html.contains("Showing 1 of 2 courses"));

  let paid = app.server.get("/courses?type=PAID").await.text();
  assert!(paid.contains("No courses match your search."));
}

#[tokio::test]
async fn test_landing_page_counts_courses() {
  let app = TestApp::new().await;
  app.add_course("Rust Basics").await;

  let html = app.server.get("/").await.text();
  assert!(html.contains("Newest courses"));
  assert!(html.contains("Rust Basics"));
}

#[tokio::test]
async fn test_unknown_course_is_not_found() {
  let app = TestApp::new().await;
  let response = app.server.get("/courses/424242").await;
  response.assert_status(StatusCode::NOT_FOUND);
  assert!(response.text().contains("Course not found"));
}

#[tokio::test]
async fn test_progress_accumulates_and_completes() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;
  assert!(app.state.catalog.update_course_progress("Ana", id, 45.0).await);

  let path = format!("/courses/{}/progress", id);
  let response = with_cookie(app.server.post(&path), "certiswift_user=Ana")
    .form(&[("action", "add"), ("increment", "10")])
    .await;
  response.assert_status(StatusCode::SEE_OTHER);
  assert_eq!(location(&response), format!("/courses/{}?notice=progress-updated", id));

  let rows = app.state.catalog.get_user_progress("Ana").await;
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].progress_percentage, 55.0);
  assert!(!rows[0].completed);

  with_cookie(app.server.post(&path), "certiswift_user=Ana")
    .form(&[("action", "add"), ("increment", "60")])
    .await;
  let rows = app.state.catalog.get_user_progress("Ana").await;
  assert_eq!(rows[0].progress_percentage, 100.0);
  assert!(rows[0].completed);

  let html = with_cookie(app.server.get(&format!("/courses/{}", id)), "certiswift_user=Ana")
    .await
    .text();
  assert!(html.contains("Course completed"));
  assert!(html.contains("25 of 25 modules"));
}

#[tokio::test]
async fn test_invalid_increments_leave_progress_alone() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;
  assert!(app.state.catalog.update_course_progress("Ana", id, 60.0).await);

  let path = format!("/courses/{}/progress", id);
  for increment in ["NaN", "inf", "-50", "0"] {
    let response = with_cookie(app.server.post(&path), "certiswift_user=Ana")
      .form(&[("action", "add"), ("increment", increment)])
      .await;
    assert_eq!(location(&response), format!("/courses/{}?notice=progress-failed", id));
    let rows = app.state.catalog.get_user_progress("Ana").await;
    assert_eq!(rows[0].progress_percentage, 60.0, "increment {}", increment);
  }
}

#[tokio::test]
async fn test_progress_needs_a_name() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;

  let response = app
    .server
    .post(&format!("/courses/{}/progress", id))
    .form(&[("action", "module")])
    .await;
  assert_eq!(location(&response), format!("/courses/{}?notice=name-required", id));
  assert!(app.state.catalog.get_user_progress("Ana").await.is_empty());
}

#[tokio::test]
async fn test_start_tracking_remembers_typed_name() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;

  let response = app
    .server
    .post(&format!("/courses/{}/progress", id))
    .form(&[("action", "start"), ("user_name", "  Bea ")])
    .await;
  response.assert_status(StatusCode::SEE_OTHER);
  assert_eq!(response.cookie("certiswift_user").value(), "Bea");

  let rows = app.state.catalog.get_user_progress("Bea").await;
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].progress_percentage, 0.0);

  // Starting again leaves existing progress alone
  app.state.catalog.update_course_progress("Bea", id, 30.0).await;
  with_cookie(app.server.post(&format!("/courses/{}/progress", id)), "certiswift_user=Bea")
    .form(&[("action", "start")])
    .await;
  assert_eq!(app.state.catalog.get_user_progress("Bea").await[0].progress_percentage, 30.0);
}

#[tokio::test]
async fn test_favorite_toggle_twice_restores_membership() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;
  let path = format!("/courses/{}/favorite", id);

  let first = with_cookie(app.server.post(&path), "certiswift_user=Ana").await;
  assert_eq!(location(&first), format!("/courses/{}?notice=favorite-added", id));
  assert_eq!(app.state.catalog.get_user_favorites("Ana").await, vec![id]);

  let second = with_cookie(app.server.post(&path), "certiswift_user=Ana").await;
  assert_eq!(location(&second), format!("/courses/{}?notice=favorite-removed", id));
  assert!(app.state.catalog.get_user_favorites("Ana").await.is_empty());
}

#[tokio::test]
async fn test_ratings_average_to_one_decimal() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;
  let path = format!("/courses/{}/ratings", id);

  for (name, stars) in [("Ana", "4"), ("Bo", "5")] {
    let response = app
      .server
      .post(&path)
      .form(&[("user_name", name), ("rating", stars), ("review", "")])
      .await;
    assert_eq!(location(&response), format!("/courses/{}?notice=rating-added", id));
  }

  let html = app.server.get(&format!("/courses/{}", id)).await.text();
  assert!(html.contains("4.5 (2)"));
  assert!(html.contains("Bo"));
}

#[tokio::test]
async fn test_invalid_rating_rerenders_with_error() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;

  let response = app
    .server
    .post(&format!("/courses/{}/ratings", id))
    .form(&[("user_name", "Ana"), ("review", "great")])
    .await;
  response.assert_status_ok();
  let html = response.text();
  assert!(html.contains("Please select a rating"));
  assert!(html.contains("great"));
  assert!(app.state.catalog.get_course_ratings(id).await.is_empty());
}

#[tokio::test]
async fn test_dashboard_prompts_then_summarizes() {
  let app = TestApp::new().await;
  let id = app.add_course("Rust Basics").await;

  let anonymous = app.server.get("/dashboard").await.text();
  assert!(anonymous.contains("Tell us your name"));

  app.state.catalog.update_course_progress("Ana", id, 100.0).await;
  app.state.catalog.toggle_favorite("Ana", id).await;
  app
    .state
    .catalog
    .award_achievement("Ana", "completion", "Finisher", "Completed a course")
    .await;

  let html = with_cookie(app.server.get("/dashboard"), "certiswift_user=Ana")
    .await
    .text();
  assert!(html.contains("Rust Basics"));
  assert!(html.contains("Finisher"));
  assert!(html.contains("100%"));
}

#[tokio::test]
async fn test_identity_sets_cookie_and_returns() {
  let app = TestApp::new().await;

  let response = app
    .server
    .post("/identity")
    .form(&[("name", "Ana"), ("return_to", "/courses")])
    .await;
  assert_eq!(location(&response), "/courses?notice=name-saved");
  assert_eq!(response.cookie("certiswift_user").value(), "Ana");

  let offsite = app
    .server
    .post("/identity")
    .form(&[("name", "Ana"), ("return_to", "//evil.example")])
    .await;
  assert_eq!(location(&offsite), "/?notice=name-saved");
}
