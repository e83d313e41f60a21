//! Heuristic spam scoring for support messages.
//!
//! Flagged messages are still delivered, only tagged.

use regex::Regex;
use std::sync::LazyLock;

const SPAM_KEYWORDS: [&str; 33] = [
  "free money",
  "get rich quick",
  "make money fast",
  "work from home",
  "click here",
  "limited time",
  "act now",
  "urgent",
  "congratulations",
  "winner",
  "prize",
  "lottery",
  "viagra",
  "casino",
  "gambling",
  "bitcoin",
  "crypto investment",
  "guaranteed income",
  "easy money",
  "nigerian prince",
  "inheritance",
  "million dollars",
  "bank transfer",
  "verify account",
  "suspended account",
  "update payment",
  "refund",
  "sex",
  "adult",
  "dating",
  "singles",
  "meet women",
  "hot girls",
];

/// Uppercase share above which text counts as shouting
const MAX_UPPERCASE_RATIO: f64 = 0.3;

/// A character repeated this many times in a row is suspicious
const REPEATED_RUN: usize = 4;

static PUNCTUATION_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[!?]{2,}").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://|www\.").unwrap());

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpamReport {
  pub keyword_hits: Vec<&'static str>,
  pub excessive_caps: bool,
  pub excessive_punctuation: bool,
  pub repeated_chars: bool,
  pub has_links: bool,
}

impl SpamReport {
  pub fn is_spam(&self) -> bool {
    !self.keyword_hits.is_empty()
      || self.excessive_caps
      || self.excessive_punctuation
      || self.repeated_chars
      || self.has_links
  }
}

/// Score the combined `subject message name` text
pub fn score(text: &str) -> SpamReport {
  let lower = text.to_lowercase();
  let keyword_hits = SPAM_KEYWORDS
    .iter()
    .copied()
    .filter(|keyword| lower.contains(keyword))
    .collect();

  let total = text.chars().count();
  let upper = text.chars().filter(|c| c.is_ascii_uppercase()).count();

  SpamReport {
    keyword_hits,
    excessive_caps: upper as f64 > total as f64 * MAX_UPPERCASE_RATIO,
    excessive_punctuation: PUNCTUATION_RUN.is_match(text),
    repeated_chars: has_repeated_run(text, REPEATED_RUN),
    has_links: LINK.is_match(text),
  }
}

/// True when any character appears `run` or more times consecutively
fn has_repeated_run(text: &str, run: usize) -> bool {
  let mut previous = None;
  let mut count = 0;
  for c in text.chars() {
    if Some(c) == previous {
      count += 1;
    } else {
      previous = Some(c);
      count = 1;
    }
    if count >= run {
      return true;
    }
  }
  false
}
