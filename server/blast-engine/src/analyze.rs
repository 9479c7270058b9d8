//! Analysis orchestrator: one pass from plan to BlastResult.

use std::collections::HashSet;

use chrono::Utc;
use fix_store::FixStore;
use serde_json::Value;

use crate::classify;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::graph;
use crate::history;
use crate::plan;
use crate::score;
use crate::traverse;
use crate::types::{AffectedResource, BlastNode, BlastResult, PlanSummary, Severity, WhyPath};

/// The blast-radius analyzer. Stateless across calls; each analysis fully
/// computes its result from the inputs it is handed.
pub struct Analyzer {
  config: Config,
}

impl Analyzer {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  /// Run a full blast radius analysis.
  ///
  /// `dot_text` is the optional dependency graph; without it, propagation
  /// contributes nothing. The fix store is read-only for the whole call.
  pub fn analyze(
    &self,
    plan_json: &Value,
    store: &FixStore,
    dot_text: Option<&str>,
  ) -> Result<BlastResult, AnalysisError> {
    let resources = plan::extract_resources(plan_json)?;
    let changed = plan::changed_resources(&resources);

    let nodes: Vec<BlastNode> = changed.iter().map(BlastNode::from_change).collect();
    let control_points: Vec<BlastNode> =
      nodes.iter().filter(|n| n.is_control_point).cloned().collect();

    // Propagation, when a graph is supplied. Traversal runs over the
    // reverse adjacency: downstream blast, not upstream prerequisites.
    let (l1, l2) = match dot_text {
      Some(dot) if !nodes.is_empty() => {
        let (_forward, reverse) = graph::parse_dot_graph(dot);
        let (l1, l2) = traverse::compute_tiered_affected(&nodes, &reverse, self.config.max_depth);
        let changed_addrs: HashSet<&str> = nodes.iter().map(|n| n.address.as_str()).collect();
        // Intra-plan dependency edges never inflate the score; under a
        // greenfield plan this leaves only pre-existing infrastructure.
        let keep = |ar: &AffectedResource| !changed_addrs.contains(ar.address.as_str());
        (
          l1.into_iter().filter(keep).collect::<Vec<_>>(),
          l2.into_iter().filter(keep).collect::<Vec<_>>(),
        )
      }
      _ => (Vec::new(), Vec::new()),
    };

    // History prior is independent of the graph.
    let changed_types = distinct_types(&nodes);
    let (history_count, history_matches) =
      history::compute_history_prior(&changed_types, &nodes, store, &self.config);

    let score = score::compute_blast_score(&nodes, l1.len(), l2.len(), history_count, &self.config);
    let severity = Severity::from_score(score);

    let has_destructive = nodes.iter().any(|n| n.action.is_destructive());
    let checks = classify::generate_checks(&control_points, has_destructive);

    let affected: Vec<AffectedResource> = l1.into_iter().chain(l2).collect();
    let why_paths: Vec<WhyPath> = affected
      .iter()
      .take(self.config.why_paths_cap)
      .map(|ar| WhyPath {
        target: ar.address.clone(),
        depth: ar.depth,
        path: ar.path.clone(),
      })
      .collect();

    let mut plan_summary = PlanSummary {
      total_changes: nodes.len(),
      control_points: control_points.len(),
      affected_resources: affected.len(),
      ..PlanSummary::default()
    };
    for node in &nodes {
      *plan_summary.by_action.entry(node.action.as_str().to_string()).or_insert(0) += 1;
    }

    Ok(BlastResult {
      analysis_id: analysis_id(&nodes),
      timestamp: Utc::now().to_rfc3339(),
      score,
      severity,
      changes: nodes,
      control_points,
      affected,
      why_paths,
      checks,
      history_matches,
      plan_summary,
    })
  }
}

fn distinct_types(nodes: &[BlastNode]) -> Vec<String> {
  let mut types: Vec<String> = Vec::new();
  for node in nodes {
    if !types.contains(&node.resource_type) {
      types.push(node.resource_type.clone());
    }
  }
  types
}

/// Stable analysis id: hash of the changed set, so identical plans get
/// identical ids across runs.
fn analysis_id(nodes: &[BlastNode]) -> String {
  let mut hasher = blake3::Hasher::new();
  for node in nodes {
    hasher.update(node.address.as_bytes());
    hasher.update(b"|");
    hasher.update(node.action.as_str().as_bytes());
    hasher.update(b"\n");
  }
  let hex = hasher.finalize().to_hex();
  format!("bra-{}", &hex[..12])
}
