//! Control-point classification: which resource types are trust or
//! network boundaries, and what to double-check before applying.

use crate::types::BlastNode;

/// Resource type prefix -> (category, criticality 0-1).
///
/// Kept as data, scanned with longest-prefix-wins; table order must not
/// matter for correctness.
const CONTROL_POINT_PATTERNS: &[(&str, &str, f64)] = &[
  // AWS IAM
  ("aws_iam_role_policy_attachment", "iam", 0.9),
  ("aws_iam_role_policy", "iam", 0.9),
  ("aws_iam_policy_attachment", "iam", 0.9),
  ("aws_iam_group_policy_attachment", "iam", 0.85),
  ("aws_iam_user_policy_attachment", "iam", 0.85),
  ("aws_iam_role", "iam", 0.9),
  ("aws_iam_policy", "iam", 0.85),
  ("aws_iam_user", "iam", 0.8),
  ("aws_iam_group", "iam", 0.75),
  // Azure RBAC
  ("azurerm_role_assignment", "rbac", 0.9),
  ("azurerm_key_vault_access_policy", "rbac", 0.85),
  ("azurerm_role_definition", "rbac", 0.85),
  // GCP IAM
  ("google_project_iam", "iam", 0.9),
  ("google_service_account", "iam", 0.85),
  // Network boundaries
  ("aws_security_group", "network", 0.8),
  ("aws_network_acl", "network", 0.8),
  ("aws_route_table", "network", 0.7),
  ("azurerm_network_security_group", "network", 0.8),
  ("azurerm_firewall_rule", "network", 0.85),
  ("google_compute_firewall", "network", 0.8),
];

/// Recommended checks per control-point category.
const CATEGORY_CHECKS: &[(&str, &[&str])] = &[
  (
    "iam",
    &[
      "Review IAM policy least-privilege before applying",
      "Check service account permissions",
    ],
  ),
  (
    "rbac",
    &[
      "Review RBAC role assignment scope",
      "Verify key vault access policy changes",
    ],
  ),
  (
    "network",
    &["Verify security group rules", "Check for open 0.0.0.0/0 rules"],
  ),
];

const DESTRUCTIVE_CHECK: &str = "Confirm resource is not referenced by other stacks";

/// Classify a resource type as a control point.
///
/// Prefix matching so e.g. `google_project_iam_member` matches
/// `google_project_iam`; among all matching prefixes the longest wins, so a
/// more specific type never inherits a coarser entry's weight.
pub fn classify_control_point(resource_type: &str) -> Option<(&'static str, f64)> {
  let rt = resource_type.to_lowercase();
  let mut best: Option<(&'static str, f64)> = None;
  let mut best_len = 0;
  for &(prefix, category, criticality) in CONTROL_POINT_PATTERNS {
    if rt.starts_with(prefix) && prefix.len() > best_len {
      best = Some((category, criticality));
      best_len = prefix.len();
    }
  }
  best
}

pub fn is_boundary_resource(resource_type: &str) -> bool {
  classify_control_point(resource_type).is_some()
}

/// Recommended checks from control-point categories, first-encountered
/// order, one batch per category; destructive plans add a reference check.
pub fn generate_checks(control_points: &[BlastNode], has_destructive: bool) -> Vec<String> {
  let mut checks: Vec<String> = Vec::new();
  let mut seen: Vec<&str> = Vec::new();

  for cp in control_points {
    let category = match cp.category.as_deref() {
      Some(c) if !seen.contains(&c) => c,
      _ => continue,
    };
    seen.push(category);
    if let Some((_, prompts)) = CATEGORY_CHECKS.iter().find(|(c, _)| *c == category) {
      checks.extend(prompts.iter().map(|p| p.to_string()));
    }
  }

  if has_destructive {
    checks.push(DESTRUCTIVE_CHECK.to_string());
  }

  checks
}
