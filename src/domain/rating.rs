use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRating {
  pub id: i64,
  pub course_id: i64,
  pub user_name: String,
  pub rating: u8,
  pub review: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl CourseRating {
  pub fn created_label(&self) -> String {
    self.created_at.format("%b %-d, %Y").to_string()
  }

  pub fn stars(&self) -> String {
    star_strip(self.rating as u32)
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
  #[error("Please enter your name")]
  MissingName,
  #[error("Please select a rating")]
  OutOfRange,
}

/// A validated rating ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRating {
  pub course_id: i64,
  pub user_name: String,
  pub rating: u8,
  pub review: Option<String>,
}

impl NewRating {
  pub fn new(
    course_id: i64,
    user_name: &str,
    rating: u8,
    review: Option<&str>,
  ) -> Result<Self, RatingError> {
    let user_name = user_name.trim();
    if user_name.is_empty() {
      return Err(RatingError::MissingName);
    }
    if !(MIN_STARS..=MAX_STARS).contains(&rating) {
      return Err(RatingError::OutOfRange);
    }
    let review = review
      .map(str::trim)
      .filter(|r| !r.is_empty())
      .map(str::to_string);

    Ok(Self {
      course_id,
      user_name: user_name.to_string(),
      rating,
      review,
    })
  }
}

/// Aggregate over every fetched rating of one course.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
  pub count: usize,
  pub average: Option<f64>,
}

impl RatingSummary {
  pub fn from_ratings(ratings: &[CourseRating]) -> Self {
    let count = ratings.len();
    let average = if count > 0 {
      let sum: u32 = ratings.iter().map(|r| r.rating as u32).sum();
      Some(sum as f64 / count as f64)
    } else {
      None
    };
    Self { count, average }
  }

  /// Mean rounded to one decimal for display
  pub fn display_average(&self) -> String {
    format!("{:.1}", self.average.unwrap_or(0.0))
  }

  pub fn rounded_stars(&self) -> u32 {
    self.average.map(|a| a.round() as u32).unwrap_or(0)
  }

  pub fn stars(&self) -> String {
    star_strip(self.rounded_stars())
  }
}

fn star_strip(filled: u32) -> String {
  let filled = filled.min(MAX_STARS as u32) as usize;
  let mut strip = "★".repeat(filled);
  strip.push_str(&"☆".repeat(MAX_STARS as usize - filled));
  strip
}
