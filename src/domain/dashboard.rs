//! Per-visitor learning summary assembled from progress, favorites and achievements.

use super::{Achievement, Course, CourseProgress};

/// Progress row joined with its course
#[derive(Debug, Clone)]
pub struct ProgressEntry {
  pub course: Course,
  pub percentage: i64,
  pub completed: bool,
  pub last_accessed: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardSummary {
  pub completed_count: usize,
  pub in_progress_count: usize,
  /// Integer mean of all progress percentages, 0 with no rows
  pub average_progress: i64,
  pub progress: Vec<ProgressEntry>,
  pub favorites: Vec<Course>,
  pub achievements: Vec<Achievement>,
}

impl DashboardSummary {
  pub fn build(
    progress: &[CourseProgress],
    courses: &[Course],
    favorite_ids: &[i64],
    achievements: Vec<Achievement>,
  ) -> Self {
    let completed_count = progress.iter().filter(|p| p.completed).count();
    let in_progress_count = progress
      .iter()
      .filter(|p| !p.completed && p.progress_percentage > 0.0)
      .count();

    let average_progress = if progress.is_empty() {
      0
    } else {
      let sum: f64 = progress.iter().map(|p| p.progress_percentage).sum();
      (sum / progress.len() as f64).round() as i64
    };

    let find = |id: i64| courses.iter().find(|c| c.id == id);

    // Rows whose course no longer exists are skipped, not reported
    let entries = progress
      .iter()
      .filter_map(|p| {
        find(p.course_id).map(|course| ProgressEntry {
          course: course.clone(),
          percentage: p.progress_percentage.round() as i64,
          completed: p.completed,
          last_accessed: p
            .last_accessed
            .map(|t| t.format("%b %-d, %Y").to_string()),
        })
      })
      .collect();

    let favorites = favorite_ids
      .iter()
      .filter_map(|id| find(*id).cloned())
      .collect();

    Self {
      completed_count,
      in_progress_count,
      average_progress,
      progress: entries,
      favorites,
      achievements,
    }
  }
}
