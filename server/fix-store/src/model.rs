//! Fix record model (JSON contract + search helpers).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_id() -> String {
  Uuid::new_v4().to_string()
}

/// One recorded fix: what broke, how it was resolved.
///
/// `issue` and `resolution` are required; everything else is optional
/// context. Records coming in over JSON may omit id/timestamps and get
/// fresh ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fix {
  pub issue: String,
  pub resolution: String,
  #[serde(default)]
  pub error_excerpt: Option<String>,
  /// Comma-separated tags, e.g. "aws_iam_role, iam".
  #[serde(default)]
  pub tags: Option<String>,
  #[serde(default)]
  pub notes: Option<String>,
  #[serde(default = "new_id")]
  pub id: String,
  #[serde(default = "Utc::now")]
  pub created_at: DateTime<Utc>,
  #[serde(default = "Utc::now")]
  pub updated_at: DateTime<Utc>,
  #[serde(default)]
  pub author: Option<String>,
  #[serde(default)]
  pub author_email: Option<String>,
}

impl Fix {
  pub fn new(issue: impl Into<String>, resolution: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      issue: issue.into(),
      resolution: resolution.into(),
      error_excerpt: None,
      tags: None,
      notes: None,
      id: new_id(),
      created_at: now,
      updated_at: now,
      author: None,
      author_email: None,
    }
  }

  pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
    self.tags = Some(tags.into());
    self
  }

  pub fn with_error_excerpt(mut self, excerpt: impl Into<String>) -> Self {
    self.error_excerpt = Some(excerpt.into());
    self
  }

  /// First 8 chars of the id, for list displays and match summaries.
  pub fn short_id(&self) -> String {
    self.id.chars().take(8).collect()
  }

  /// One-line summary for list displays.
  pub fn summary(&self) -> String {
    let tags = match &self.tags {
      Some(t) => format!(" [{}]", t),
      None => String::new(),
    };
    let preview = if self.issue.chars().count() > 40 {
      format!("{}...", self.issue.chars().take(40).collect::<String>())
    } else {
      self.issue.clone()
    };
    format!("{}{} - {}", self.short_id(), tags, preview)
  }

  /// Keyword search over issue, resolution, excerpt, tags, and notes.
  ///
  /// AND matching by default (all words must appear); `match_any` switches
  /// to OR. Empty queries match nothing.
  pub fn matches(&self, query: &str, match_any: bool) -> bool {
    let searchable = [
      Some(self.issue.as_str()),
      Some(self.resolution.as_str()),
      self.error_excerpt.as_deref(),
      self.tags.as_deref(),
      self.notes.as_deref(),
    ]
    .iter()
    .flatten()
    .cloned()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();

    let words: Vec<String> = query.to_lowercase().split_whitespace().map(String::from).collect();
    if words.is_empty() {
      return false;
    }
    if match_any {
      words.iter().any(|w| searchable.contains(w.as_str()))
    } else {
      words.iter().all(|w| searchable.contains(w.as_str()))
    }
  }

  /// Tag set match. AND by default; `match_any` switches to OR.
  pub fn matches_tags(&self, required: &[String], match_any: bool) -> bool {
    let tags = match &self.tags {
      Some(t) => t,
      None => return false,
    };
    let fix_tags: Vec<String> = tags
      .split(',')
      .map(|t| t.trim().to_lowercase())
      .filter(|t| !t.is_empty())
      .collect();
    let required: Vec<String> = required
      .iter()
      .map(|t| t.trim().to_lowercase())
      .filter(|t| !t.is_empty())
      .collect();
    if required.is_empty() {
      return true;
    }
    if match_any {
      required.iter().any(|r| fix_tags.contains(r))
    } else {
      required.iter().all(|r| fix_tags.contains(r))
    }
  }

  /// Is this fix tagged with the given resource type (substring match)?
  pub fn matches_resource_type(&self, resource_type: &str) -> bool {
    match &self.tags {
      Some(tags) => tags.to_lowercase().contains(&resource_type.to_lowercase()),
      None => false,
    }
  }

  pub fn touch(&mut self) {
    self.updated_at = Utc::now();
  }
}
