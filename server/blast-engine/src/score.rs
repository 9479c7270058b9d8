//! Blast score: linear and auditable, no sigmoid.
//!
//! Each contribution reads straight off the coefficient table in `Config`.

use crate::config::Config;
use crate::types::{Action, BlastNode, Severity};

/// Compute the blast score, 0-100, one decimal.
///
/// Components, summed then clamped:
/// 1. Action points per changed resource (boundary resources x1.5).
/// 2. Greenfield discount when every change is a create — a large new
///    deployment must not score maximal purely on resource count.
/// 3. Impact points: capped L1+L2 count times a situation multiplier.
///    Callers pass counts that already exclude intra-plan addresses.
/// 4. History overlay: capped points per prior incident match.
pub fn compute_blast_score(
  nodes: &[BlastNode],
  l1_count: usize,
  l2_count: usize,
  history_match_count: usize,
  config: &Config,
) -> f64 {
  if nodes.is_empty() {
    return 0.0;
  }

  let greenfield = nodes.iter().all(|n| n.action == Action::Create);

  let mut total = 0.0;
  for node in nodes {
    let mut points = match node.action {
      Action::Delete => config.points_delete,
      Action::Replace => config.points_replace,
      Action::Update => config.points_update,
      Action::Create => config.points_create,
      Action::NoOp | Action::Unknown => 0.0,
    };
    if node.is_control_point {
      points *= config.boundary_multiplier;
    }
    if greenfield {
      points *= if node.is_control_point {
        config.greenfield_boundary_discount
      } else {
        config.greenfield_discount
      };
    }
    total += points;
  }

  let all_plain_updates = nodes
    .iter()
    .all(|n| n.action == Action::Update && !n.is_control_point);
  let impact_multiplier = if greenfield {
    config.impact_multiplier_greenfield
  } else if all_plain_updates {
    config.impact_multiplier_updates_only
  } else {
    config.impact_multiplier
  };

  let impacted = (l1_count + l2_count).min(config.impact_cap) as f64;
  total += impacted * impact_multiplier;

  total += (history_match_count as f64 * config.history_step).min(config.history_cap);

  (total.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Map a score to its severity label.
pub fn severity_label(score: f64) -> Severity {
  Severity::from_score(score)
}
