//! Bounded propagation through the dependency graph.
//!
//! A generic multi-source BFS plus the L1/L2 tiering policy on top. The
//! BFS itself knows nothing about boundaries or actions; gating happens in
//! `compute_tiered_affected` so the traversal stays reusable.

use std::collections::{HashSet, VecDeque};

use crate::graph::Adjacency;
use crate::types::{AffectedResource, BlastNode};

/// BFS from all seeds at once, bounded by `max_depth`.
///
/// Records the depth and path at first discovery, so each node keeps the
/// shortest path found (ties broken by discovery order). Cycle-safe: a
/// visited node is never re-queued. Seeds are excluded from the result.
/// Output is in discovery order.
pub fn compute_affected_set(
  seeds: &[String],
  adjacency: &Adjacency,
  max_depth: usize,
) -> Vec<AffectedResource> {
  let mut visited: HashSet<String> = seeds.iter().cloned().collect();
  let mut queue: VecDeque<(String, usize, Vec<String>)> = seeds
    .iter()
    .map(|s| (s.clone(), 0, vec![s.clone()]))
    .collect();
  let mut affected: Vec<AffectedResource> = Vec::new();

  while let Some((current, depth, path)) = queue.pop_front() {
    if depth >= max_depth {
      continue;
    }
    let neighbors = match adjacency.get(&current) {
      Some(n) => n,
      None => continue,
    };
    for neighbor in neighbors {
      if !visited.insert(neighbor.clone()) {
        continue;
      }
      let mut new_path = path.clone();
      new_path.push(neighbor.clone());
      affected.push(AffectedResource {
        address: neighbor.clone(),
        depth: depth + 1,
        path: new_path.clone(),
      });
      queue.push_back((neighbor.clone(), depth + 1, new_path));
    }
  }

  affected
}

/// Tiered affected sets: L1 is depth exactly 1, L2 is depth >= 2.
///
/// L2 is discarded unless some seed is a control point or has a
/// destructive action — indirect impact is only worth surfacing when the
/// direct change touches a boundary or destroys something.
pub fn compute_tiered_affected(
  nodes: &[BlastNode],
  adjacency: &Adjacency,
  max_depth: usize,
) -> (Vec<AffectedResource>, Vec<AffectedResource>) {
  let seeds: Vec<String> = nodes.iter().map(|n| n.address.clone()).collect();
  let affected = compute_affected_set(&seeds, adjacency, max_depth);

  let expand_l2 = nodes
    .iter()
    .any(|n| n.is_control_point || n.action.is_destructive());

  let mut l1: Vec<AffectedResource> = Vec::new();
  let mut l2: Vec<AffectedResource> = Vec::new();
  for ar in affected {
    if ar.depth == 1 {
      l1.push(ar);
    } else if expand_l2 {
      l2.push(ar);
    }
  }
  (l1, l2)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Action;

  fn adj(edges: &[(&str, &[&str])]) -> Adjacency {
    edges
      .iter()
      .map(|(from, tos)| {
        (
          from.to_string(),
          tos.iter().map(|t| t.to_string()).collect(),
        )
      })
      .collect()
  }

  fn seeds(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn single_hop() {
    let adjacency = adj(&[("A", &["B"])]);
    let result = compute_affected_set(&seeds(&["A"]), &adjacency, 5);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].address, "B");
    assert_eq!(result[0].depth, 1);
    assert_eq!(result[0].path, vec!["A", "B"]);
  }

  #[test]
  fn multi_hop() {
    let adjacency = adj(&[("A", &["B"]), ("B", &["C"])]);
    let result = compute_affected_set(&seeds(&["A"]), &adjacency, 5);
    let addrs: Vec<&str> = result.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addrs, vec!["B", "C"]);
    assert_eq!(result[1].path, vec!["A", "B", "C"]);
  }

  #[test]
  fn max_depth_respected() {
    let adjacency = adj(&[("A", &["B"]), ("B", &["C"]), ("C", &["D"])]);
    let result = compute_affected_set(&seeds(&["A"]), &adjacency, 2);
    let addrs: Vec<&str> = result.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addrs, vec!["B", "C"]);
    assert!(result.iter().all(|r| r.depth <= 2));
  }

  #[test]
  fn cycle_safety() {
    let adjacency = adj(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);
    let result = compute_affected_set(&seeds(&["A"]), &adjacency, 10);
    let addrs: Vec<&str> = result.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addrs, vec!["B", "C"]);
  }

  #[test]
  fn multiple_starts_share_visited() {
    let adjacency = adj(&[("A", &["C"]), ("B", &["C"]), ("C", &["D"])]);
    let result = compute_affected_set(&seeds(&["A", "B"]), &adjacency, 5);
    let addrs: Vec<&str> = result.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addrs, vec!["C", "D"]);
    // C discovered from the earliest seed.
    assert_eq!(result[0].path, vec!["A", "C"]);
  }

  #[test]
  fn seeds_never_in_result() {
    let adjacency = adj(&[("A", &["B"]), ("B", &["A"])]);
    let result = compute_affected_set(&seeds(&["A"]), &adjacency, 5);
    assert!(result.iter().all(|r| r.address != "A"));
  }

  #[test]
  fn disconnected_nodes_unreached() {
    let adjacency = adj(&[("A", &["B"]), ("X", &["Y"])]);
    let result = compute_affected_set(&seeds(&["A"]), &adjacency, 5);
    let addrs: Vec<&str> = result.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addrs, vec!["B"]);
  }

  #[test]
  fn l2_gated_for_non_boundary_update() {
    let nodes = vec![BlastNode::new("aws_s3_bucket.data", "aws_s3_bucket", Action::Update)];
    let adjacency = adj(&[("aws_s3_bucket.data", &["B"]), ("B", &["C"])]);
    let (l1, l2) = compute_tiered_affected(&nodes, &adjacency, 5);
    assert_eq!(l1.len(), 1);
    assert_eq!(l1[0].address, "B");
    assert!(l2.is_empty());
  }

  #[test]
  fn l2_included_for_boundary_update() {
    let nodes = vec![BlastNode::new(
      "aws_security_group.main",
      "aws_security_group",
      Action::Update,
    )];
    let adjacency = adj(&[("aws_security_group.main", &["B"]), ("B", &["C"])]);
    let (l1, l2) = compute_tiered_affected(&nodes, &adjacency, 5);
    assert_eq!(l1.len(), 1);
    assert_eq!(l2.len(), 1);
    assert_eq!(l2[0].address, "C");
  }

  #[test]
  fn l2_included_for_delete() {
    let nodes = vec![BlastNode::new("aws_s3_bucket.data", "aws_s3_bucket", Action::Delete)];
    let adjacency = adj(&[("aws_s3_bucket.data", &["B"]), ("B", &["C"])]);
    let (l1, l2) = compute_tiered_affected(&nodes, &adjacency, 5);
    assert_eq!(l1.len(), 1);
    assert_eq!(l2.len(), 1);
  }

  #[test]
  fn l2_included_for_replace() {
    let nodes = vec![BlastNode::new("aws_s3_bucket.data", "aws_s3_bucket", Action::Replace)];
    let adjacency = adj(&[("aws_s3_bucket.data", &["B"]), ("B", &["C"])]);
    let (_, l2) = compute_tiered_affected(&nodes, &adjacency, 5);
    assert_eq!(l2.len(), 1);
  }
}
