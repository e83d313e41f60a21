use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CourseType {
  #[default]
  #[serde(rename = "FREE")]
  Free,
  #[serde(rename = "PAID")]
  Paid,
}

impl CourseType {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "FREE" | "free" => Some(Self::Free),
      "PAID" | "paid" => Some(Self::Paid),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Free => "FREE",
      Self::Paid => "PAID",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "Beginner" => Some(Self::Beginner),
      "Intermediate" => Some(Self::Intermediate),
      "Advanced" => Some(Self::Advanced),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Beginner => "Beginner",
      Self::Intermediate => "Intermediate",
      Self::Advanced => "Advanced",
    }
  }
}

/// A catalog entry as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub id: i64,
  pub title: String,
  pub description: String,
  pub provider: String,
  pub instructor: Option<String>,
  pub price: Option<f64>,
  #[serde(rename = "type")]
  pub course_type: CourseType,
  pub image_url: Option<String>,
  pub course_url: Option<String>,
  pub rating: Option<f64>,
  pub difficulty: Option<Difficulty>,
  pub duration: Option<String>,
  pub category: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Course {
  pub fn is_free(&self) -> bool {
    self.course_type == CourseType::Free
  }

  /// "Free" for free courses, otherwise the price with two decimals
  pub fn price_label(&self) -> String {
    match (self.course_type, self.price) {
      (CourseType::Free, _) => "Free".to_string(),
      (CourseType::Paid, Some(price)) => format!("${:.2}", price),
      (CourseType::Paid, None) => "Paid".to_string(),
    }
  }

  pub fn difficulty_label(&self) -> &'static str {
    self.difficulty.map(|d| d.as_str()).unwrap_or("")
  }

  pub fn created_label(&self) -> String {
    self.created_at.format("%b %-d, %Y").to_string()
  }

  /// Field set used to prefill the edit form
  pub fn to_draft(&self) -> CourseDraft {
    CourseDraft {
      title: self.title.clone(),
      description: self.description.clone(),
      provider: self.provider.clone(),
      instructor: self.instructor.clone(),
      price: self.price,
      course_type: self.course_type,
      image_url: self.image_url.clone(),
      course_url: self.course_url.clone(),
      rating: self.rating,
      difficulty: self.difficulty,
      duration: self.duration.clone(),
      category: self.category.clone(),
    }
  }
}

/// Course fields minus the generated ones (id, created_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CourseDraft {
  pub title: String,
  pub description: String,
  pub provider: String,
  pub instructor: Option<String>,
  pub price: Option<f64>,
  #[serde(rename = "type")]
  pub course_type: CourseType,
  pub image_url: Option<String>,
  pub course_url: Option<String>,
  pub rating: Option<f64>,
  pub difficulty: Option<Difficulty>,
  pub duration: Option<String>,
  pub category: Option<String>,
}

/// Search term and type filter applied to the course listing.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
  pub query: String,
  pub course_type: Option<CourseType>,
}

impl CourseFilter {
  pub fn new(query: &str, course_type: Option<CourseType>) -> Self {
    Self {
      query: query.trim().to_lowercase(),
      course_type,
    }
  }

  pub fn matches(&self, course: &Course) -> bool {
    let text_match = self.query.is_empty()
      || course.title.to_lowercase().contains(&self.query)
      || course.provider.to_lowercase().contains(&self.query)
      || course.description.to_lowercase().contains(&self.query);

    let type_match = self
      .course_type
      .map(|t| t == course.course_type)
      .unwrap_or(true);

    text_match && type_match
  }

  pub fn apply(&self, courses: &[Course]) -> Vec<Course> {
    courses.iter().filter(|c| self.matches(c)).cloned().collect()
  }
}
