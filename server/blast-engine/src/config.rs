//! Engine configuration with sane defaults.
//!
//! The scoring coefficients are policy, calibrated against the scenario
//! tests; they live here in one place so deployments can tune them without
//! touching scoring code.

#[derive(Debug, Clone)]
pub struct Config {
  /// Max BFS traversal depth through the dependency graph.
  pub max_depth: usize,
  /// Max why-path explanations included in a result.
  pub why_paths_cap: usize,
  /// Max deduplicated history matches returned.
  pub history_match_cap: usize,

  /// Action points for a delete.
  pub points_delete: f64,
  /// Action points for a replace (create+delete).
  pub points_replace: f64,
  /// Action points for an in-place update.
  pub points_update: f64,
  /// Action points for a create.
  pub points_create: f64,
  /// Multiplier on action points when the resource is a control point.
  pub boundary_multiplier: f64,
  /// Discount on non-boundary creates when every change is a create.
  pub greenfield_discount: f64,
  /// Discount on boundary creates in a greenfield plan. Smaller than the
  /// plain discount: a misconfigured boundary is risky even when new.
  pub greenfield_boundary_discount: f64,

  /// Cap on counted impacted resources (L1 + L2).
  pub impact_cap: usize,
  /// Points per impacted resource, normally.
  pub impact_multiplier: f64,
  /// Points per impacted resource when every change is a plain
  /// non-boundary update.
  pub impact_multiplier_updates_only: f64,
  /// Points per impacted resource in a greenfield plan (counts must
  /// already exclude intra-plan addresses).
  pub impact_multiplier_greenfield: f64,

  /// Score points per history match.
  pub history_step: f64,
  /// Cap on the total history contribution.
  pub history_cap: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      max_depth: 5,
      why_paths_cap: 20,
      history_match_cap: 3,
      points_delete: 20.0,
      points_replace: 25.0,
      points_update: 5.0,
      points_create: 8.0,
      boundary_multiplier: 1.5,
      greenfield_discount: 0.3,
      greenfield_boundary_discount: 0.5,
      impact_cap: 25,
      impact_multiplier: 1.5,
      impact_multiplier_updates_only: 0.5,
      impact_multiplier_greenfield: 0.375,
      history_step: 5.0,
      history_cap: 15.0,
    }
  }
}
