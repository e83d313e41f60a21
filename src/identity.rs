//! Visitor identity carried in cookies.
//!
//! Learners have no accounts: a visitor is whatever display name they typed,
//! kept in a plain cookie. A second random cookie identifies the browser for
//! support rate limiting.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::convert::Infallible;

use crate::auth::session::generate_session_id;
use crate::config::{CLIENT_COOKIE, MAX_DISPLAY_NAME_CHARS, USER_COOKIE, VISITOR_COOKIE_DAYS};

/// Current visitor, extracted from the name cookie. Never rejects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visitor {
  pub name: Option<String>,
}

impl Visitor {
  pub fn from_jar(jar: &CookieJar) -> Self {
    Self {
      name: jar.get(USER_COOKIE).and_then(|c| clean_display_name(c.value())),
    }
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }
}

impl<S: Send + Sync> FromRequestParts<S> for Visitor {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let jar = CookieJar::from_request_parts(parts, state).await?;
    Ok(Self::from_jar(&jar))
  }
}

/// Trim and cap a display name; blank input means "no name"
pub fn clean_display_name(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }
  Some(trimmed.chars().take(MAX_DISPLAY_NAME_CHARS).collect::<String>().trim_end().to_string())
}

fn visitor_cookie(name: &'static str, value: String) -> Cookie<'static> {
  Cookie::build((name, value))
    .path("/")
    .http_only(true)
    .secure(false) // Set to true in production with HTTPS
    .max_age(time::Duration::days(VISITOR_COOKIE_DAYS))
    .build()
}

/// Store or, for a blank name, clear the display name
pub fn set_display_name(jar: CookieJar, raw: &str) -> CookieJar {
  match clean_display_name(raw) {
    Some(name) => jar.add(visitor_cookie(USER_COOKIE, name)),
    None => jar.remove(Cookie::build(USER_COOKIE).path("/")),
  }
}

/// The browser's client key, issuing a fresh one into the jar when missing
pub fn client_key(jar: CookieJar) -> (CookieJar, String) {
  match jar.get(CLIENT_COOKIE).map(|c| c.value().to_string()) {
    Some(key) if !key.is_empty() => (jar, key),
    _ => {
      let key = generate_session_id();
      (jar.add(visitor_cookie(CLIENT_COOKIE, key.clone())), key)
    }
  }
}
