//! Support request intake: validate, verify the mail domain, rate limit,
//! score for spam and relay to the configured sink.

pub mod dns;
pub mod rate_limit;
pub mod spam;
pub mod validation;
pub mod webhook;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub use dns::{DohResolver, DomainResolver, ResolveError};
pub use rate_limit::RateLimiter;
pub use spam::SpamReport;
pub use validation::ValidatedRequest;
pub use webhook::{LogSink, NotificationSink, NotifyError, WebhookSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportKind {
  BugReport,
  FeatureRequest,
  GeneralQuestion,
  CourseIssue,
}

impl SupportKind {
  pub const ALL: [SupportKind; 4] = [
    Self::BugReport,
    Self::FeatureRequest,
    Self::GeneralQuestion,
    Self::CourseIssue,
  ];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "Bug Report" => Some(Self::BugReport),
      "Feature Request" => Some(Self::FeatureRequest),
      "General Question" => Some(Self::GeneralQuestion),
      "Course Issue" => Some(Self::CourseIssue),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::BugReport => "Bug Report",
      Self::FeatureRequest => "Feature Request",
      Self::GeneralQuestion => "General Question",
      Self::CourseIssue => "Course Issue",
    }
  }
}

/// Raw form fields as posted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupportForm {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default, rename = "type")]
  pub kind: String,
  #[serde(default)]
  pub subject: String,
  #[serde(default)]
  pub message: String,
}

/// What a sink receives
#[derive(Debug, Clone, PartialEq)]
pub struct SupportMessage {
  pub name: String,
  pub email: String,
  pub kind: SupportKind,
  pub subject: String,
  pub message: String,
  pub spam: SpamReport,
}

/// Display strings are shown to the visitor as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SupportError {
  #[error("Please fill in all fields")]
  MissingFields,
  #[error("Please enter a valid name (at least 2 characters)")]
  NameTooShort,
  #[error("Name should not contain numbers")]
  NameHasDigits,
  #[error("Name should contain only letters and spaces")]
  NameInvalidChars,
  #[error("Invalid email format")]
  InvalidEmail,
  #[error("Email address appears suspicious")]
  SuspiciousEmail,
  #[error("Email domain does not exist or cannot receive emails")]
  UnknownDomain,
  #[error("Please provide a more descriptive subject (at least 5 characters)")]
  SubjectTooShort,
  #[error("Please keep the subject under 100 characters")]
  SubjectTooLong,
  #[error("Please provide more details in your message (at least 10 characters)")]
  MessageTooShort,
  #[error("Please keep the message under 1000 characters")]
  MessageTooLong,
  #[error("Please choose a request type")]
  InvalidKind,
  #[error("Please wait {0} more seconds before sending another support request")]
  RateLimited(u64),
  #[error("Failed to send support request. Please try again.")]
  DeliveryFailed,
}

/// Everything a submission needs, shared across requests
pub struct SupportDesk {
  resolver: Arc<dyn DomainResolver>,
  sink: Arc<dyn NotificationSink>,
  limiter: RateLimiter,
}

impl SupportDesk {
  pub fn new(
    resolver: Arc<dyn DomainResolver>,
    sink: Arc<dyn NotificationSink>,
    rate_limit: Duration,
  ) -> Self {
    Self {
      resolver,
      sink,
      limiter: RateLimiter::new(rate_limit),
    }
  }

  /// Validate and relay one submission identified by `client_keys`.
  ///
  /// Nothing leaves the process unless every local check passed. A stamp on
  /// any key blocks the request, and every key is stamped once the sink
  /// accepted the message.
  pub async fn submit(
    &self,
    client_keys: &[String],
    form: &SupportForm,
  ) -> Result<SupportMessage, SupportError> {
    let request = validation::validate(form)?;

    let left = client_keys.iter().filter_map(|key| self.limiter.remaining(key)).max();
    if let Some(left) = left {
      return Err(SupportError::RateLimited(left.as_secs().max(1)));
    }

    self.verify_domain(&request.domain()).await?;

    let spam = spam::score(&format!(
      "{} {} {}",
      request.subject, request.message, request.name
    ));
    if spam.is_spam() {
      tracing::info!("Support request from {} flagged as spam: {:?}", request.email, spam);
    }

    let message = SupportMessage {
      name: request.name,
      email: request.email,
      kind: request.kind,
      subject: request.subject,
      message: request.message,
      spam,
    };

    if let Err(e) = self.sink.deliver(&message).await {
      tracing::warn!("Failed to deliver support request: {}", e);
      return Err(SupportError::DeliveryFailed);
    }

    for key in client_keys {
      self.limiter.record(key);
    }
    Ok(message)
  }

  async fn verify_domain(&self, domain: &str) -> Result<(), SupportError> {
    if validation::is_known_domain(domain) {
      return Ok(());
    }

    match self.resolver.has_mx(domain).await {
      Ok(true) => Ok(()),
      Ok(false) => Err(SupportError::UnknownDomain),
      Err(e) => {
        tracing::warn!("MX lookup for {} failed: {}", domain, e);
        if validation::is_fallback_domain(domain) {
          Ok(())
        } else {
          Err(SupportError::UnknownDomain)
        }
      }
    }
  }
}
