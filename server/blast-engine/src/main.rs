//! Binary entrypoint: read one JSON analysis request from stdin, write one
//! BlastResult JSON object to stdout.
//!
//! Fix history comes either inline (`fixes`) or from a fix-store file
//! (`fixes_path`); inline wins when both are present.

use blast_engine::{Analyzer, Config};
use fix_store::{Fix, FixStore};
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Read, Write};

#[derive(Debug, Deserialize)]
struct Request {
  plan: Value,
  #[serde(default)]
  graph_dot: Option<String>,
  #[serde(default)]
  fixes: Option<Vec<Fix>>,
  #[serde(default)]
  fixes_path: Option<String>,
  #[serde(default)]
  max_depth: Option<usize>,
}

fn main() {
  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "blast-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let request: Request = serde_json::from_str(&raw)?;

  let store = match (request.fixes, request.fixes_path) {
    (Some(fixes), _) => FixStore::from_fixes(fixes),
    (None, Some(path)) => FixStore::open(path)?,
    (None, None) => FixStore::in_memory(),
  };

  let mut config = Config::default();
  if let Some(depth) = request.max_depth {
    config.max_depth = depth;
  }

  let analyzer = Analyzer::new(config);
  let result = analyzer.analyze(&request.plan, &store, request.graph_dot.as_deref())?;

  let json = serde_json::to_vec(&result)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
