//! Structured error types for the fix store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("no fix matches id '{0}'")]
  NotFound(String),

  #[error("id prefix '{0}' matches more than one fix")]
  AmbiguousId(String),
}
