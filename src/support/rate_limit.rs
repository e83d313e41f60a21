//! Per-client spacing of successful support submissions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub struct RateLimiter {
  window: Duration,
  last_sent: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
  pub fn new(window: Duration) -> Self {
    Self {
      window,
      last_sent: Mutex::new(HashMap::new()),
    }
  }

  pub fn window(&self) -> Duration {
    self.window
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
    self.last_sent.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Time left before `key` may submit again, `None` when allowed now
  pub fn remaining(&self, key: &str) -> Option<Duration> {
    let last = *self.lock().get(key)?;
    let elapsed = last.elapsed();
    (elapsed < self.window).then(|| self.window - elapsed)
  }

  /// Stamp a successful submission, dropping stamps that have aged out
  pub fn record(&self, key: &str) {
    let mut last_sent = self.lock();
    let window = self.window;
    last_sent.retain(|_, at| at.elapsed() < window);
    last_sent.insert(key.to_string(), Instant::now());
  }
}
