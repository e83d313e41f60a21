pub mod course;
pub mod dashboard;
pub mod engagement;
pub mod progress;
pub mod rating;

pub use course::{Course, CourseDraft, CourseFilter, CourseType, Difficulty};
pub use dashboard::{DashboardSummary, ProgressEntry};
pub use engagement::{Achievement, AdminRecord, FavoriteState, NewAchievement, NewAdmin};
pub use progress::{CourseProgress, ProgressStatus, ProgressTracker, ProgressUpdate};
pub use rating::{CourseRating, NewRating, RatingError, RatingSummary};
