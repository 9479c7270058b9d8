//! Core types for the analysis engine (JSON contracts + internal models).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Normalized change action for one resource. Only the first four count as
/// real changes; no-op (covers read/refresh-only plans) and unknown are
/// excluded from scoring entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
  Create,
  Update,
  Delete,
  Replace,
  #[serde(rename = "no-op")]
  NoOp,
  Unknown,
}

impl Action {
  /// Normalize a plan's raw `actions` array. A create and a delete in the
  /// same change means the resource is replaced.
  pub fn from_raw(actions: &[String]) -> Self {
    let has = |a: &str| actions.iter().any(|x| x == a);
    if has("create") && has("delete") {
      Self::Replace
    } else if has("delete") {
      Self::Delete
    } else if has("update") {
      Self::Update
    } else if has("create") {
      Self::Create
    } else {
      Self::NoOp
    }
  }

  pub fn is_change(self) -> bool {
    matches!(self, Self::Create | Self::Update | Self::Delete | Self::Replace)
  }

  pub fn is_destructive(self) -> bool {
    matches!(self, Self::Delete | Self::Replace)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Create => "create",
      Self::Update => "update",
      Self::Delete => "delete",
      Self::Replace => "replace",
      Self::NoOp => "no-op",
      Self::Unknown => "unknown",
    }
  }
}

// ---------------------------------------------------------------------------
// Cloud provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
  Aws,
  Azure,
  Gcp,
  Unknown,
}

impl CloudProvider {
  /// Detect from the resource type prefix, falling back to provider metadata.
  pub fn detect(resource_type: &str, provider_name: &str) -> Self {
    let rt = resource_type.to_lowercase();
    let provider = provider_name.to_lowercase();
    if rt.starts_with("aws_") || provider.contains("hashicorp/aws") {
      Self::Aws
    } else if rt.starts_with("azurerm_") || provider.contains("hashicorp/azurerm") {
      Self::Azure
    } else if rt.starts_with("google_") || provider.contains("hashicorp/google") {
      Self::Gcp
    } else {
      Self::Unknown
    }
  }
}

// ---------------------------------------------------------------------------
// Extracted resource change
// ---------------------------------------------------------------------------

/// One resource touched by the plan, as produced by extraction. Immutable
/// for the rest of the analysis pass.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceChange {
  pub address: String,
  pub resource_type: String,
  pub name: String,
  pub cloud_provider: CloudProvider,
  pub action: Action,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub module_path: Option<String>,
  /// Planned values (the plan's `after` block), already redacted.
  #[serde(skip_serializing_if = "Value::is_null")]
  pub values: Value,
}

// ---------------------------------------------------------------------------
// Blast node (change + classification)
// ---------------------------------------------------------------------------

/// A changed resource annotated with its control-point classification.
#[derive(Debug, Clone, Serialize)]
pub struct BlastNode {
  pub address: String,
  pub resource_type: String,
  pub action: Action,
  pub cloud_provider: CloudProvider,
  pub is_control_point: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  pub criticality: f64,
}

impl BlastNode {
  /// Build a node, running control-point classification on the type.
  pub fn new(address: impl Into<String>, resource_type: impl Into<String>, action: Action) -> Self {
    let resource_type = resource_type.into();
    let classification = classify::classify_control_point(&resource_type);
    Self {
      address: address.into(),
      cloud_provider: CloudProvider::detect(&resource_type, ""),
      is_control_point: classification.is_some(),
      category: classification.map(|(c, _)| c.to_string()),
      criticality: classification.map(|(_, w)| w).unwrap_or(0.0),
      resource_type,
      action,
    }
  }

  pub fn from_change(change: &ResourceChange) -> Self {
    let mut node = Self::new(change.address.clone(), change.resource_type.clone(), change.action);
    node.cloud_provider = change.cloud_provider;
    node
  }
}

// ---------------------------------------------------------------------------
// Traversal output
// ---------------------------------------------------------------------------

/// A resource reached by propagation from a changed resource. Never a seed.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedResource {
  pub address: String,
  /// Hop count from the nearest seed (>= 1).
  pub depth: usize,
  /// Shortest discovered path, seed first.
  pub path: Vec<String>,
}

// ---------------------------------------------------------------------------
// Result types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
  Critical,
}

impl Severity {
  pub fn from_score(score: f64) -> Self {
    if score >= 75.0 {
      Self::Critical
    } else if score >= 50.0 {
      Self::High
    } else if score >= 25.0 {
      Self::Medium
    } else {
      Self::Low
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
      Self::Critical => "critical",
    }
  }
}

/// One deduplicated history match, summarized for display.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryMatch {
  /// Short fix id (first 8 chars).
  pub id: String,
  pub issue: String,
  pub resource_type: String,
}

/// Capped explanation entry: how propagation reached a resource.
#[derive(Debug, Clone, Serialize)]
pub struct WhyPath {
  pub target: String,
  pub depth: usize,
  pub path: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanSummary {
  pub total_changes: usize,
  pub control_points: usize,
  pub affected_resources: usize,
  pub by_action: BTreeMap<String, usize>,
}

/// Complete result of one analysis pass. Assembled once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct BlastResult {
  pub analysis_id: String,
  pub timestamp: String,
  pub score: f64,
  pub severity: Severity,
  pub changes: Vec<BlastNode>,
  pub control_points: Vec<BlastNode>,
  pub affected: Vec<AffectedResource>,
  pub why_paths: Vec<WhyPath>,
  pub checks: Vec<String>,
  pub history_matches: Vec<HistoryMatch>,
  pub plan_summary: PlanSummary,
}
