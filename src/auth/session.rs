//! In-memory admin session storage.
//!
//! Sessions are keyed by the random ID stored in the admin cookie and expire a
//! fixed number of hours after login. Expired entries are dropped on lookup
//! and, occasionally, in a sweep of the whole map.

use crate::config;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Logged-in admin as seen by handlers
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSession {
  pub email: String,
  pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AdminSessions {
  sessions: Arc<Mutex<HashMap<String, AdminSession>>>,
  lifetime: Duration,
}

impl AdminSessions {
  pub fn new(lifetime_hours: i64) -> Self {
    Self {
      sessions: Arc::new(Mutex::new(HashMap::new())),
      lifetime: Duration::hours(lifetime_hours),
    }
  }

  pub fn lifetime(&self) -> Duration {
    self.lifetime
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, AdminSession>> {
    // Entries are plain data, so a poisoned map is still usable
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Start a session and return its ID
  pub fn create(&self, email: &str) -> String {
    let id = generate_session_id();
    let session = AdminSession {
      email: email.to_string(),
      expires_at: Utc::now() + self.lifetime,
    };
    self.lock().insert(id.clone(), session);
    id
  }

  pub fn get(&self, session_id: &str) -> Option<AdminSession> {
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions);
    }

    match sessions.get(session_id) {
      Some(session) if session.expires_at > Utc::now() => Some(session.clone()),
      Some(_) => {
        sessions.remove(session_id);
        None
      }
      None => None,
    }
  }

  pub fn remove(&self, session_id: &str) {
    self.lock().remove(session_id);
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[cfg(test)]
  fn expire_now(&self, session_id: &str) {
    if let Some(session) = self.lock().get_mut(session_id) {
      session.expires_at = Utc::now() - Duration::seconds(1);
    }
  }
}

/// Drop every session past its expiry
fn cleanup_expired(sessions: &mut HashMap<String, AdminSession>) {
  let now = Utc::now();
  sessions.retain(|_, session| session.expires_at > now);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_session_id_shape() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_session_id());
  }

  #[test]
  fn test_create_get_remove() {
    let sessions = AdminSessions::new(8);
    let id = sessions.create("admin@example.com");

    let session = sessions.get(&id).unwrap();
    assert_eq!(session.email, "admin@example.com");
    assert!(session.expires_at > Utc::now() + Duration::hours(7));

    sessions.remove(&id);
    assert!(sessions.get(&id).is_none());
    assert!(sessions.is_empty());
  }

  #[test]
  fn test_expired_session_is_dropped() {
    let sessions = AdminSessions::new(8);
    let id = sessions.create("admin@example.com");
    sessions.expire_now(&id);

    assert!(sessions.get(&id).is_none());
    assert_eq!(sessions.len(), 0);
  }

  #[test]
  fn test_cleanup_keeps_live_sessions() {
    let sessions = AdminSessions::new(1);
    let live = sessions.create("a@example.com");
    let dead = sessions.create("b@example.com");
    sessions.expire_now(&dead);

    cleanup_expired(&mut sessions.lock());
    assert_eq!(sessions.len(), 1);
    assert!(sessions.get(&live).is_some());
  }
}
