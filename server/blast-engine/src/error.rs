//! Structured error types for the analysis engine.
//!
//! Only structurally invalid input is an error; sparse or malformed
//! optional inputs (graph text, history) degrade to neutral contributions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
  #[error("invalid plan: {0}")]
  InvalidPlan(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl AnalysisError {
  pub fn invalid_plan(reason: impl Into<String>) -> Self {
    Self::InvalidPlan(reason.into())
  }
}
