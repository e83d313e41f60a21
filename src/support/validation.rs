//! Local checks on a support form. None of these touch the network.

use regex::Regex;
use std::sync::LazyLock;

use super::{SupportError, SupportForm, SupportKind};
use crate::config::{
  SUPPORT_MESSAGE_MAX_CHARS, SUPPORT_MESSAGE_MIN_CHARS, SUPPORT_NAME_MIN_CHARS,
  SUPPORT_SUBJECT_MAX_CHARS, SUPPORT_SUBJECT_MIN_CHARS,
};

/// Domains accepted without a DNS lookup
pub const KNOWN_MAIL_DOMAINS: [&str; 14] = [
  "gmail.com",
  "yahoo.com",
  "outlook.com",
  "hotmail.com",
  "icloud.com",
  "protonmail.com",
  "aol.com",
  "mail.com",
  "zoho.com",
  "live.com",
  "msn.com",
  "yandex.com",
  "rediffmail.com",
  "fastmail.com",
];

/// Domains still accepted when the DNS lookup itself fails
pub const FALLBACK_MAIL_DOMAINS: [&str; 4] = ["gmail.com", "yahoo.com", "outlook.com", "hotmail.com"];

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

static SUSPICIOUS_EMAIL: LazyLock<[Regex; 4]> = LazyLock::new(|| {
  [
    // Long digit run right before the @
    Regex::new(r"\d{6,}@").unwrap(),
    // One or two letter local part
    Regex::new(r"^[a-z]{1,2}@").unwrap(),
    // Digits-only local part
    Regex::new(r"^\d+@").unwrap(),
    // Domain starting with digits
    Regex::new(r"@\d+\w+\.").unwrap(),
  ]
});

/// Support request that passed every local check, fields trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
  pub name: String,
  pub email: String,
  pub kind: SupportKind,
  pub subject: String,
  pub message: String,
}

impl ValidatedRequest {
  /// Lowercased part after the `@`
  pub fn domain(&self) -> String {
    email_domain(&self.email)
  }
}

pub fn email_domain(email: &str) -> String {
  email
    .rsplit_once('@')
    .map(|(_, domain)| domain.to_lowercase())
    .unwrap_or_default()
}

pub fn is_known_domain(domain: &str) -> bool {
  KNOWN_MAIL_DOMAINS.contains(&domain)
}

pub fn is_fallback_domain(domain: &str) -> bool {
  FALLBACK_MAIL_DOMAINS.contains(&domain)
}

/// Run every check that needs no network, first failure wins
pub fn validate(form: &SupportForm) -> Result<ValidatedRequest, SupportError> {
  let name = form.name.trim();
  let email = form.email.trim();
  let kind = form.kind.trim();
  let subject = form.subject.trim();
  let message = form.message.trim();

  if [name, email, kind, subject, message].iter().any(|f| f.is_empty()) {
    return Err(SupportError::MissingFields);
  }

  validate_name(name)?;
  validate_email(email)?;

  let subject_len = subject.chars().count();
  if subject_len < SUPPORT_SUBJECT_MIN_CHARS {
    return Err(SupportError::SubjectTooShort);
  }
  if subject_len > SUPPORT_SUBJECT_MAX_CHARS {
    return Err(SupportError::SubjectTooLong);
  }

  let message_len = message.chars().count();
  if message_len < SUPPORT_MESSAGE_MIN_CHARS {
    return Err(SupportError::MessageTooShort);
  }
  if message_len > SUPPORT_MESSAGE_MAX_CHARS {
    return Err(SupportError::MessageTooLong);
  }

  let kind = SupportKind::from_str(kind).ok_or(SupportError::InvalidKind)?;

  Ok(ValidatedRequest {
    name: name.to_string(),
    email: email.to_string(),
    kind,
    subject: subject.to_string(),
    message: message.to_string(),
  })
}

pub fn validate_name(name: &str) -> Result<(), SupportError> {
  if name.chars().count() < SUPPORT_NAME_MIN_CHARS {
    return Err(SupportError::NameTooShort);
  }
  if name.chars().any(|c| c.is_ascii_digit()) {
    return Err(SupportError::NameHasDigits);
  }
  if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
    return Err(SupportError::NameInvalidChars);
  }
  Ok(())
}

pub fn validate_email(email: &str) -> Result<(), SupportError> {
  if !EMAIL_SHAPE.is_match(email) {
    return Err(SupportError::InvalidEmail);
  }
  if SUSPICIOUS_EMAIL.iter().any(|re| re.is_match(email)) {
    return Err(SupportError::SuspiciousEmail);
  }
  Ok(())
}
