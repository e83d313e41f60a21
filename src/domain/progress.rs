//! Per-course progress rows and the tracker that moves them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assumed total course time used for the remaining-time estimate
const ESTIMATED_COURSE_HOURS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
  pub id: i64,
  pub user_id: String,
  pub course_id: i64,
  pub progress_percentage: f64,
  pub completed: bool,
  pub last_accessed: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

/// Row written by the progress upsert. `completed` is always derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
  pub user_id: String,
  pub course_id: i64,
  pub progress_percentage: f64,
  pub completed: bool,
  pub last_accessed: DateTime<Utc>,
}

impl ProgressUpdate {
  pub fn new(user_id: &str, course_id: i64, percentage: f64) -> Self {
    let tracker = ProgressTracker::new(percentage);
    Self {
      user_id: user_id.to_string(),
      course_id,
      progress_percentage: tracker.percentage(),
      completed: tracker.completed(),
      last_accessed: Utc::now(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
  NotStarted,
  Started,
  InProgress,
  Completed,
}

impl ProgressStatus {
  pub fn label(&self) -> &'static str {
    match self {
      Self::NotStarted => "Not Started",
      Self::Started => "Started",
      Self::InProgress => "In Progress",
      Self::Completed => "Completed",
    }
  }
}

/// Percentage accumulator clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressTracker {
  percentage: f64,
}

impl ProgressTracker {
  pub fn new(percentage: f64) -> Self {
    Self {
      percentage: clamp_percentage(percentage),
    }
  }

  pub fn from_progress(progress: Option<&CourseProgress>) -> Self {
    Self::new(progress.map(|p| p.progress_percentage).unwrap_or(0.0))
  }

  pub fn percentage(&self) -> f64 {
    self.percentage
  }

  pub fn completed(&self) -> bool {
    self.percentage >= 100.0
  }

  /// Advance by one module's share of the course
  pub fn complete_module(self, total_modules: u32) -> Self {
    let modules = total_modules.max(1) as f64;
    self.add(100.0 / modules)
  }

  pub fn add(self, increment: f64) -> Self {
    Self::new(self.percentage + increment)
  }

  pub fn completed_modules(&self, total_modules: u32) -> u32 {
    ((self.percentage / 100.0) * total_modules as f64).floor() as u32
  }

  pub fn rounded(&self) -> i64 {
    self.percentage.round() as i64
  }

  /// `None` once the course is completed
  pub fn estimated_hours_remaining(&self) -> Option<u32> {
    if self.completed() {
      return None;
    }
    let remaining = 100.0 - self.percentage;
    Some(((remaining / 100.0) * ESTIMATED_COURSE_HOURS).ceil() as u32)
  }

  pub fn status(&self, started: bool) -> ProgressStatus {
    if !started {
      ProgressStatus::NotStarted
    } else if self.completed() {
      ProgressStatus::Completed
    } else if self.percentage > 0.0 {
      ProgressStatus::InProgress
    } else {
      ProgressStatus::Started
    }
  }
}

fn clamp_percentage(value: f64) -> f64 {
  if value.is_nan() {
    0.0
  } else {
    value.clamp(0.0, 100.0)
  }
}
