mod common;

use common::{location, with_cookie, TestApp};

fn form<'a>(name: &'a str, email: &'a str, subject: &'a str, message: &'a str) -> Vec<(&'static str, &'a str)> {
  vec![
    ("name", name),
    ("email", email),
    ("type", "Bug Report"),
    ("subject", subject),
    ("message", message),
  ]
}

const SUBJECT: &str = "Video will not load";
const MESSAGE: &str = "The second lesson video stays black on every browser.";

#[tokio::test]
async fn test_support_page_lists_request_types() {
  let app = TestApp::new().await;
  let html = app.server.get("/support").await.text();
  for kind in ["Bug Report", "Feature Request", "General Question", "Course Issue"] {
    assert!(html.contains(kind));
  }
}

#[tokio::test]
async fn test_local_rejections_never_reach_the_network() {
  let app = TestApp::new().await;
  let long_subject = "s".repeat(101);
  let long_message = "m".repeat(1001);
  let cases = [
    (form("A", "jane@example.org", SUBJECT, MESSAGE), "at least 2 characters"),
    (form("Jane5", "jane@example.org", SUBJECT, MESSAGE), "Name should not contain numbers"),
    (form("Mary-Jane", "jane@example.org", SUBJECT, MESSAGE), "only letters and spaces"),
    (form("Jane", "jane-at-example", SUBJECT, MESSAGE), "Invalid email format"),
    (form("Jane", "jane@example.org", "Help", MESSAGE), "more descriptive subject"),
    (form("Jane", "jane@example.org", SUBJECT, "Broken"), "more details in your message"),
    (form("Jane", "jane@example.org", &long_subject, MESSAGE), "under 100 characters"),
    (form("Jane", "jane@example.org", SUBJECT, &long_message), "under 1000 characters"),
  ];

  for (fields, expected) in cases {
    let response = app.server.post("/support").form(&fields).await;
    response.assert_status_ok();
    assert!(response.text().contains(expected), "expected '{}'", expected);
  }

  assert_eq!(app.resolver.calls(), 0);
  assert_eq!(app.sink.count(), 0);
}

#[tokio::test]
async fn test_valid_request_is_relayed() {
  let app = TestApp::new().await;

  let response = app
    .server
    .post("/support")
    .form(&form("Jane Doe", "jane@example.org", SUBJECT, MESSAGE))
    .await;
  assert_eq!(location(&response), "/support?notice=support-sent");
  assert_eq!(app.resolver.calls(), 1);
  assert_eq!(app.sink.count(), 1);

  let sent = app.sink.sent.lock().unwrap();
  assert_eq!(sent[0].subject, SUBJECT);
  assert!(!sent[0].spam.is_spam());
}

#[tokio::test]
async fn test_known_domain_skips_lookup() {
  let app = TestApp::new().await;

  app
    .server
    .post("/support")
    .form(&form("Jane Doe", "jane.doe@gmail.com", SUBJECT, MESSAGE))
    .await;
  assert_eq!(app.resolver.calls(), 0);
  assert_eq!(app.sink.count(), 1);
}

#[tokio::test]
async fn test_second_request_within_window_is_rate_limited() {
  let app = TestApp::new().await;
  let fields = form("Jane Doe", "jane@example.org", SUBJECT, MESSAGE);

  app.server.post("/support").form(&fields).await;
  assert_eq!(app.resolver.calls(), 1);

  let second = app.server.post("/support").form(&fields).await;
  second.assert_status_ok();
  assert!(second.text().contains("Please wait"));

  // Rejected before the domain lookup
  assert_eq!(app.resolver.calls(), 1);
  assert_eq!(app.sink.count(), 1);
}

#[tokio::test]
async fn test_support_page_issues_client_cookie() {
  let app = TestApp::new().await;
  let response = app.server.get("/support").await;
  response.assert_status_ok();
  assert!(!response.cookie("certiswift_client").value().is_empty());
}

#[tokio::test]
async fn test_replayed_client_cookie_is_rate_limited_across_emails() {
  let app = TestApp::new().await;

  let first = app
    .server
    .post("/support")
    .form(&form("Jane Doe", "jane@example.org", SUBJECT, MESSAGE))
    .await;
  assert_eq!(location(&first), "/support?notice=support-sent");
  let cookie = format!("certiswift_client={}", first.cookie("certiswift_client").value());

  // Same browser, different address
  let second = with_cookie(app.server.post("/support"), &cookie)
    .form(&form("Jane Doe", "someone.else@example.org", SUBJECT, MESSAGE))
    .await;
  second.assert_status_ok();
  assert!(second.text().contains("Please wait"));
  assert_eq!(app.sink.count(), 1);
}

#[tokio::test]
async fn test_cookie_from_support_page_is_honoured_on_submit() {
  let app = TestApp::new().await;
  let page = app.server.get("/support").await;
  let cookie = format!("certiswift_client={}", page.cookie("certiswift_client").value());

  let first = with_cookie(app.server.post("/support"), &cookie)
    .form(&form("Jane Doe", "jane@example.org", SUBJECT, MESSAGE))
    .await;
  assert_eq!(location(&first), "/support?notice=support-sent");

  let second = with_cookie(app.server.post("/support"), &cookie)
    .form(&form("Jane Doe", "jane.two@example.org", SUBJECT, MESSAGE))
    .await;
  assert!(second.text().contains("Please wait"));
  assert_eq!(app.sink.count(), 1);
}
