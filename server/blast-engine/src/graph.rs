//! Decode `terraform graph` DOT text into adjacency mappings.
//!
//! Line-oriented: only `<node> -> <node>` edge lines matter, quoted or not.
//! Malformed text decodes to empty adjacency — never an error; the analysis
//! simply proceeds without propagation.

use std::collections::{BTreeMap, BTreeSet};

/// Adjacency as ordered maps so traversal order is deterministic.
pub type Adjacency = BTreeMap<String, BTreeSet<String>>;

/// Parse DOT text into (forward, reverse) adjacency.
///
/// Forward holds edges as written (`A -> B`); reverse inverts them, giving
/// "what depends on this node" when the source graph points at
/// prerequisites, which is what propagation traverses.
pub fn parse_dot_graph(dot_text: &str) -> (Adjacency, Adjacency) {
  let mut forward: Adjacency = BTreeMap::new();
  let mut reverse: Adjacency = BTreeMap::new();

  for line in dot_text.lines() {
    let stripped = line.trim();
    if stripped.is_empty()
      || stripped.starts_with("//")
      || stripped.starts_with('#')
      || stripped.starts_with("subgraph")
      || stripped.starts_with("digraph")
      || stripped == "{"
      || stripped == "}"
    {
      continue;
    }

    if let Some((src, dst)) = parse_edge(stripped) {
      forward.entry(src.clone()).or_default().insert(dst.clone());
      forward.entry(dst.clone()).or_default();
      reverse.entry(dst).or_default().insert(src.clone());
      reverse.entry(src).or_default();
    }
  }

  (forward, reverse)
}

fn parse_edge(line: &str) -> Option<(String, String)> {
  let idx = line.find("->")?;
  let src = extract_node(&line[..idx])?;
  let dst = extract_node(&line[idx + 2..])?;
  Some((normalize_node(&src), normalize_node(&dst)))
}

/// Pull one node name out of a fragment on either side of `->`.
/// Quoted names keep internal spaces; unquoted names end at whitespace,
/// a `;`, or an attribute block.
fn extract_node(fragment: &str) -> Option<String> {
  let t = fragment.trim();
  if let Some(rest) = t.strip_prefix('"') {
    let end = rest.find('"')?;
    return Some(rest[..end].to_string());
  }
  let token: String = t
    .chars()
    .take_while(|c| !c.is_whitespace() && *c != ';' && *c != '[')
    .collect();
  if token.is_empty() {
    None
  } else {
    Some(token)
  }
}

/// Normalize a graph node name to match plan addresses: strip the
/// `[root] ` prefix and `(expand)`/`(close)` suffixes.
fn normalize_node(name: &str) -> String {
  let mut n = name.trim();
  if let Some(rest) = n.strip_prefix("[root] ") {
    n = rest;
  }
  for suffix in ["(expand)", "(close)"] {
    if let Some(rest) = n.strip_suffix(suffix) {
      n = rest;
    }
  }
  n.trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn simple_quoted_edge() {
    let (fwd, _) = parse_dot_graph("\"aws_iam_role.app\" -> \"aws_lambda_function.api\"");
    assert!(fwd["aws_iam_role.app"].contains("aws_lambda_function.api"));
  }

  #[test]
  fn unquoted_edge() {
    let (fwd, _) = parse_dot_graph("nodeA -> nodeB");
    assert!(fwd["nodeA"].contains("nodeB"));
  }

  #[test]
  fn reverse_adjacency() {
    let (_, rev) = parse_dot_graph("\"A\" -> \"B\"");
    assert!(rev["B"].contains("A"));
  }

  #[test]
  fn normalizes_root_prefix_and_suffixes() {
    assert_eq!(normalize_node("[root] aws_iam_role.app"), "aws_iam_role.app");
    assert_eq!(normalize_node("[root] module.app (expand)"), "module.app");
    assert_eq!(normalize_node("[root] module.app (close)"), "module.app");
  }

  #[test]
  fn ignores_comments_and_structure() {
    let dot = "// a comment\n# another\ndigraph {\nsubgraph cluster_0 {\n\"A\" -> \"B\"\n}\n}";
    let (fwd, _) = parse_dot_graph(dot);
    assert!(fwd["A"].contains("B"));
    assert_eq!(fwd.len(), 2);
  }

  #[test]
  fn empty_input() {
    let (fwd, rev) = parse_dot_graph("");
    assert!(fwd.is_empty());
    assert!(rev.is_empty());
  }

  #[test]
  fn garbage_degrades_to_empty() {
    let (fwd, rev) = parse_dot_graph("this is not dot at all\n:::\n");
    assert!(fwd.is_empty());
    assert!(rev.is_empty());
  }

  #[test]
  fn real_terraform_snippet() {
    let dot = r#"digraph {
  "[root] aws_iam_role.app" -> "[root] provider.aws"
  "[root] aws_lambda_function.api" -> "[root] aws_iam_role.app"
}"#;
    let (fwd, rev) = parse_dot_graph(dot);
    assert!(fwd["aws_iam_role.app"].contains("provider.aws"));
    assert!(fwd["aws_lambda_function.api"].contains("aws_iam_role.app"));
    assert!(rev["aws_iam_role.app"].contains("aws_lambda_function.api"));
  }

  #[test]
  fn multiple_edges_from_same_node() {
    let (fwd, _) = parse_dot_graph("\"A\" -> \"B\"\n\"A\" -> \"C\"");
    let expected: BTreeSet<String> = ["B", "C"].iter().map(|s| s.to_string()).collect();
    assert_eq!(fwd["A"], expected);
  }

  #[test]
  fn edge_with_attributes_and_semicolon() {
    let (fwd, _) = parse_dot_graph("A -> B [style=dotted];");
    assert!(fwd["A"].contains("B"));
  }
}
