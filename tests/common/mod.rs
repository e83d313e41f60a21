//! Shared harness: the full router over an in-memory store with fake
//! outbound services.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};

use certiswift::config::AppConfig;
use certiswift::domain::{CourseDraft, CourseType};
use certiswift::routes;
use certiswift::state::AppState;
use certiswift::store::SqliteStore;
use certiswift::support::{
  DomainResolver, NotificationSink, NotifyError, ResolveError, SupportMessage,
};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse";

/// Answers `true` for every domain and counts lookups
#[derive(Default)]
pub struct CountingResolver {
  pub calls: AtomicUsize,
}

impl CountingResolver {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl DomainResolver for CountingResolver {
  async fn has_mx(&self, _domain: &str) -> Result<bool, ResolveError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(true)
  }
}

#[derive(Default)]
pub struct RecordingSink {
  pub sent: Mutex<Vec<SupportMessage>>,
}

impl RecordingSink {
  pub fn count(&self) -> usize {
    self.sent.lock().unwrap().len()
  }
}

#[async_trait]
impl NotificationSink for RecordingSink {
  async fn deliver(&self, message: &SupportMessage) -> Result<(), NotifyError> {
    self.sent.lock().unwrap().push(message.clone());
    Ok(())
  }
}

pub struct TestApp {
  pub server: TestServer,
  pub state: AppState,
  pub resolver: Arc<CountingResolver>,
  pub sink: Arc<RecordingSink>,
}

impl TestApp {
  pub async fn new() -> Self {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let resolver = Arc::new(CountingResolver::default());
    let sink = Arc::new(RecordingSink::default());

    let state = AppState::build(store, resolver.clone(), sink.clone(), &AppConfig::default());
    assert!(state.catalog.bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD).await);

    let server = TestServer::new(routes::create_router(state.clone())).unwrap();
    Self {
      server,
      state,
      resolver,
      sink,
    }
  }

  /// Insert a course directly and return its id
  pub async fn add_course(&self, title: &str) -> i64 {
    let draft = CourseDraft {
      title: title.to_string(),
      description: "A course".to_string(),
      provider: "Acme".to_string(),
      course_type: CourseType::Free,
      course_url: Some("https://example.com/course".to_string()),
      ..Default::default()
    };
    assert!(self.state.catalog.add_course(&draft).await);
    self
      .state
      .catalog
      .get_courses()
      .await
      .into_iter()
      .find(|c| c.title == title)
      .map(|c| c.id)
      .unwrap()
  }

  /// Log in and return the session cookie as a `Cookie` header value
  pub async fn admin_cookie(&self) -> String {
    let response = self
      .server
      .post("/admin/login")
      .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
      .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let cookie = response.cookie("certiswift_admin");
    format!("certiswift_admin={}", cookie.value())
  }
}

/// Attach a cookie header to a request
pub fn with_cookie(request: TestRequest, value: &str) -> TestRequest {
  request.add_header(header::COOKIE, HeaderValue::from_str(value).unwrap())
}

pub fn location(response: &axum_test::TestResponse) -> String {
  response
    .header(header::LOCATION)
    .to_str()
    .unwrap()
    .to_string()
}
