//! History prior: match changed resources against recorded fixes.
//!
//! Two phases, because naive keyword search over all fixes is too noisy:
//! an address override that always runs, and a category-gated resource-type
//! match that only runs when the plan carries elevated risk. Candidates are
//! then clustered by an error fingerprint and deduplicated.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use fix_store::{Fix, FixStore};

use crate::config::Config;
use crate::types::{BlastNode, HistoryMatch};

/// A resource-type tag alone is not enough for a phase-2 match; the fix
/// must also carry one of these concern tags.
const CONCERN_CATEGORY_TAGS: &[&str] = &[
  "networking",
  "network",
  "iam",
  "rbac",
  "auth",
  "security",
  "database",
  "firewall",
  "dns",
];

struct Candidate {
  fix: Fix,
  resource_type: String,
}

/// Match changed resources against the fix corpus.
///
/// Returns the deduplicated match count and the capped match summaries.
/// The store is read-only for the duration of the call.
pub fn compute_history_prior(
  changed_types: &[String],
  nodes: &[BlastNode],
  store: &FixStore,
  config: &Config,
) -> (usize, Vec<HistoryMatch>) {
  let mut candidates: Vec<Candidate> = Vec::new();
  let mut seen_ids: HashSet<String> = HashSet::new();

  // Phase 1 — address override. A fix that names a changed address
  // directly is relevant even for a mundane update.
  for fix in store.all() {
    let issue = fix.issue.to_lowercase();
    let excerpt = fix.error_excerpt.as_deref().unwrap_or_default().to_lowercase();
    for node in nodes {
      let addr = node.address.to_lowercase();
      if addr.is_empty() || (!issue.contains(&addr) && !excerpt.contains(&addr)) {
        continue;
      }
      if seen_ids.insert(fix.id.clone()) {
        candidates.push(Candidate {
          fix: fix.clone(),
          resource_type: node.resource_type.clone(),
        });
      }
      break;
    }
  }

  // Phase 2 — resource-type match, only when the plan is risky enough to
  // warrant it (boundary resource changed, or something destroyed).
  let gate_open = nodes
    .iter()
    .any(|n| n.is_control_point || n.action.is_destructive());
  if gate_open {
    for resource_type in changed_types {
      for fix in store.find_by_resource_type(resource_type) {
        if !has_concern_tag(fix) {
          continue;
        }
        if seen_ids.insert(fix.id.clone()) {
          candidates.push(Candidate {
            fix: fix.clone(),
            resource_type: resource_type.clone(),
          });
        }
      }
    }
  }

  let deduped = dedup_candidates(candidates);
  let matches: Vec<HistoryMatch> = deduped
    .into_iter()
    .take(config.history_match_cap)
    .map(|c| HistoryMatch {
      id: c.fix.short_id(),
      issue: c.fix.issue.clone(),
      resource_type: c.resource_type,
    })
    .collect();
  (matches.len(), matches)
}

fn has_concern_tag(fix: &Fix) -> bool {
  let tags = match &fix.tags {
    Some(t) => t,
    None => return false,
  };
  tags
    .split(',')
    .map(|t| t.trim().to_lowercase())
    .any(|t| CONCERN_CATEGORY_TAGS.contains(&t.as_str()))
}

/// Fingerprint key for clustering near-duplicate fixes.
///
/// Prefers an embedded CamelCase error-style token (e.g. "AccessDenied");
/// falls back to the first four normalized words. Pure function: swapping
/// the heuristic never touches the clustering logic.
pub fn cluster_key(text: &str) -> String {
  for word in text.split_whitespace() {
    let token = word.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    if is_camel_case_token(token) {
      return token.to_lowercase();
    }
  }
  text
    .to_lowercase()
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter(|w| !w.is_empty())
    .take(4)
    .collect::<Vec<_>>()
    .join(" ")
}

/// CamelCase error token: leading uppercase, at least two uppercase
/// letters, at least one lowercase (excludes acronyms like "IAM").
fn is_camel_case_token(word: &str) -> bool {
  let upper = word.chars().filter(|c| c.is_ascii_uppercase()).count();
  let lower = word.chars().filter(|c| c.is_ascii_lowercase()).count();
  upper >= 2 && lower >= 1 && word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Collapse candidates sharing a cluster key, keeping the most complete
/// record: an error excerpt beats none; ties go to the most recent.
/// Cluster order follows first appearance.
fn dedup_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
  let mut order: Vec<String> = Vec::new();
  let mut best: HashMap<String, Candidate> = HashMap::new();

  for candidate in candidates {
    let key = cluster_key(&candidate.fix.issue);
    match best.entry(key.clone()) {
      Entry::Vacant(slot) => {
        order.push(key);
        slot.insert(candidate);
      }
      Entry::Occupied(mut slot) => {
        if more_complete(&candidate.fix, &slot.get().fix) {
          slot.insert(candidate);
        }
      }
    }
  }

  order.into_iter().filter_map(|key| best.remove(&key)).collect()
}

fn more_complete(challenger: &Fix, incumbent: &Fix) -> bool {
  match (challenger.error_excerpt.is_some(), incumbent.error_excerpt.is_some()) {
    (true, false) => true,
    (false, true) => false,
    _ => challenger.created_at > incumbent.created_at,
  }
}
