//! Hosted backend reached over its PostgREST-style HTTP interface.
//!
//! Every operation is one request against `<base>/rest/v1/<table>` with the
//! access key sent both as `apikey` and as a bearer token. Filters use the
//! `column=eq.value` syntax; ordering uses `order=column.desc`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::{CatalogStore, StoreError, StoreResult};
use crate::domain::{
  Achievement, AdminRecord, Course, CourseDraft, CourseProgress, CourseRating, FavoriteState,
  NewAchievement, NewAdmin, NewRating, ProgressUpdate,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
  code: Option<String>,
  message: Option<String>,
  details: Option<String>,
  hint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FavoriteRow {
  course_id: i64,
}

#[derive(Debug, Deserialize)]
struct IdRow {
  #[allow(dead_code)]
  id: i64,
}

pub struct RestStore {
  client: Client,
  base: Url,
  key: String,
}

impl RestStore {
  /// Both values are required; the store refuses to initialize without them.
  pub fn new(url: &str, key: &str) -> StoreResult<Self> {
    let url = url.trim();
    let key = key.trim();
    if url.is_empty() || key.is_empty() {
      return Err(StoreError::Config(
        "store endpoint URL and access key are both required".to_string(),
      ));
    }

    let base = Url::parse(url)
      .map_err(|e| StoreError::Config(format!("invalid store URL '{}': {}", url, e)))?;
    if !matches!(base.scheme(), "http" | "https") {
      return Err(StoreError::Config(format!(
        "store URL must be http(s), got '{}'",
        base.scheme()
      )));
    }

    let client = Client::builder()
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
      .user_agent(concat!("certiswift/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self {
      client,
      base,
      key: key.to_string(),
    })
  }

  pub fn table_url(&self, table: &str) -> String {
    format!("{}/rest/v1/{}", self.base.as_str().trim_end_matches('/'), table)
  }

  fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
    builder
      .header("apikey", &self.key)
      .bearer_auth(&self.key)
  }

  fn get(&self, table: &str) -> RequestBuilder {
    self.authorize(self.client.get(self.table_url(table)))
  }

  fn post(&self, table: &str, prefer: &str) -> RequestBuilder {
    self
      .authorize(self.client.post(self.table_url(table)))
      .header("Prefer", prefer)
  }

  fn patch(&self, table: &str) -> RequestBuilder {
    self
      .authorize(self.client.patch(self.table_url(table)))
      .header("Prefer", RETURN_REPRESENTATION)
  }

  fn delete(&self, table: &str) -> RequestBuilder {
    self
      .authorize(self.client.delete(self.table_url(table)))
      .header("Prefer", RETURN_REPRESENTATION)
  }

  async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> StoreResult<T> {
    let response = check(builder.send().await?).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
  }

  async fn execute(&self, builder: RequestBuilder) -> StoreResult<()> {
    check(builder.send().await?).await?;
    Ok(())
  }

  async fn count(&self, table: &str) -> StoreResult<i64> {
    let response = check(
      self
        .get(table)
        .query(&[("select", "id")])
        .header("Prefer", "count=exact")
        .header("Range-Unit", "items")
        .header("Range", "0-0")
        .send()
        .await?,
    )
    .await?;

    response
      .headers()
      .get(CONTENT_RANGE)
      .and_then(|v: &HeaderValue| v.to_str().ok())
      .and_then(parse_content_range_total)
      .ok_or_else(|| StoreError::Decode(format!("missing count for table {}", table)))
  }
}

/// Turn non-2xx responses into `StoreError::Remote`, logging the backend's hints
async fn check(response: Response) -> StoreResult<Response> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().await.unwrap_or_default();
  let message = match serde_json::from_str::<RemoteErrorBody>(&body) {
    Ok(err) => {
      let code = err.code.unwrap_or_default();
      match code.as_str() {
        "42501" => tracing::error!("Permission denied by backend, check row level security policies"),
        "42P01" | "PGRST205" => tracing::error!("Backend table not found, check the schema"),
        _ => {}
      }
      if let Some(details) = &err.details {
        tracing::debug!("Backend error details: {}", details);
      }
      if let Some(hint) = &err.hint {
        tracing::debug!("Backend error hint: {}", hint);
      }
      format!("{} (code {})", err.message.unwrap_or_default(), code)
    }
    Err(_) => body,
  };

  Err(StoreError::Remote {
    status: status.as_u16(),
    message,
  })
}

/// Total from a `Content-Range` header such as `0-0/42` or `*/0`
pub fn parse_content_range_total(value: &str) -> Option<i64> {
  value.rsplit_once('/').and_then(|(_, total)| total.trim().parse().ok())
}

fn eq(value: impl std::fmt::Display) -> String {
  format!("eq.{}", value)
}

#[async_trait]
impl CatalogStore for RestStore {
  fn backend_name(&self) -> &'static str {
    "rest"
  }

  async fn count_courses(&self) -> StoreResult<i64> {
    self.count("courses").await
  }

  async fn list_courses(&self) -> StoreResult<Vec<Course>> {
    self
      .fetch(
        self
          .get("courses")
          .query(&[("select", "*"), ("order", "created_at.desc")]),
      )
      .await
  }

  async fn get_course(&self, id: i64) -> StoreResult<Option<Course>> {
    let rows: Vec<Course> = self
      .fetch(
        self
          .get("courses")
          .query(&[("select", "*".to_string()), ("id", eq(id))]),
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn insert_course(&self, draft: &CourseDraft) -> StoreResult<i64> {
    let rows: Vec<Course> = self
      .fetch(self.post("courses", RETURN_REPRESENTATION).json(&[draft]))
      .await?;
    rows
      .first()
      .map(|c| c.id)
      .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
  }

  async fn update_course(&self, id: i64, draft: &CourseDraft) -> StoreResult<u64> {
    let rows: Vec<IdRow> = self
      .fetch(self.patch("courses").query(&[("id", eq(id))]).json(draft))
      .await?;
    Ok(rows.len() as u64)
  }

  async fn delete_course(&self, id: i64) -> StoreResult<u64> {
    let rows: Vec<IdRow> = self
      .fetch(self.delete("courses").query(&[("id", eq(id))]))
      .await?;
    Ok(rows.len() as u64)
  }

  async fn find_admin(&self, email: &str) -> StoreResult<Option<AdminRecord>> {
    let rows: Vec<AdminRecord> = self
      .fetch(
        self
          .get("admins")
          .query(&[("select", "*".to_string()), ("email", eq(email))]),
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn insert_admin(&self, admin: &NewAdmin) -> StoreResult<()> {
    self
      .execute(self.post("admins", RETURN_MINIMAL).json(admin))
      .await
  }

  async fn count_admins(&self) -> StoreResult<i64> {
    self.count("admins").await
  }

  async fn upsert_progress(&self, update: &ProgressUpdate) -> StoreResult<()> {
    self
      .execute(
        self
          .post(
            "course_progress",
            &format!("resolution=merge-duplicates,{}", RETURN_MINIMAL),
          )
          .query(&[("on_conflict", "user_id,course_id")])
          .json(update),
      )
      .await
  }

  async fn list_progress(&self, user_id: &str) -> StoreResult<Vec<CourseProgress>> {
    self
      .fetch(
        self
          .get("course_progress")
          .query(&[("select", "*".to_string()), ("user_id", eq(user_id))]),
      )
      .await
  }

  async fn insert_rating(&self, rating: &NewRating) -> StoreResult<()> {
    self
      .execute(self.post("course_ratings", RETURN_MINIMAL).json(rating))
      .await
  }

  async fn list_ratings(&self, course_id: i64) -> StoreResult<Vec<CourseRating>> {
    self
      .fetch(self.get("course_ratings").query(&[
        ("select", "*".to_string()),
        ("course_id", eq(course_id)),
        ("order", "created_at.desc".to_string()),
      ]))
      .await
  }

  async fn toggle_favorite(&self, user_id: &str, course_id: i64) -> StoreResult<FavoriteState> {
    let removed: Vec<IdRow> = self
      .fetch(
        self
          .delete("user_favorites")
          .query(&[("user_id", eq(user_id)), ("course_id", eq(course_id))]),
      )
      .await?;
    if !removed.is_empty() {
      return Ok(FavoriteState::Removed);
    }

    // Duplicate inserts from a concurrent toggle collapse on the unique pair
    self
      .execute(
        self
          .post(
            "user_favorites",
            &format!("resolution=ignore-duplicates,{}", RETURN_MINIMAL),
          )
          .query(&[("on_conflict", "user_id,course_id")])
          .json(&serde_json::json!({ "user_id": user_id, "course_id": course_id })),
      )
      .await?;
    Ok(FavoriteState::Added)
  }

  async fn list_favorites(&self, user_id: &str) -> StoreResult<Vec<i64>> {
    let rows: Vec<FavoriteRow> = self
      .fetch(
        self
          .get("user_favorites")
          .query(&[("select", "course_id".to_string()), ("user_id", eq(user_id))]),
      )
      .await?;
    Ok(rows.into_iter().map(|r| r.course_id).collect())
  }

  async fn insert_achievement(&self, achievement: &NewAchievement) -> StoreResult<()> {
    self
      .execute(self.post("achievements", RETURN_MINIMAL).json(achievement))
      .await
  }

  async fn list_achievements(&self, user_id: &str) -> StoreResult<Vec<Achievement>> {
    self
      .fetch(self.get("achievements").query(&[
        ("select", "*".to_string()),
        ("user_id", eq(user_id)),
        ("order", "earned_at.desc".to_string()),
      ]))
      .await
  }
}
