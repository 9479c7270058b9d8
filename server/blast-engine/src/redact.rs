//! Scrub sensitive values from plan change blocks.
//!
//! Two signals: the plan's own `before_sensitive`/`after_sensitive` marker
//! maps, and key-name patterns. Independent of scoring.

use std::collections::HashSet;

use serde_json::{Map, Value};

const SENSITIVE_KEY_PATTERNS: &[&str] = &[
  "password",
  "secret",
  "token",
  "api_key",
  "private_key",
  "access_key",
  "credentials",
];

const REDACTED: &str = "[REDACTED]";

fn is_sensitive_key(key: &str) -> bool {
  let k = key.to_lowercase();
  SENSITIVE_KEY_PATTERNS.iter().any(|p| k.contains(p))
}

/// Redact a full change block (`{before, after, before_sensitive, ...}`).
///
/// Marker maps are consumed and dropped from the output; nested objects in
/// the remaining entries are scrubbed by marker key or key pattern.
pub fn redact_change_block(change: &Value) -> Value {
  let obj = match change.as_object() {
    Some(obj) => obj,
    None => return change.clone(),
  };

  let mut sensitive_keys = HashSet::new();
  for phase in ["before_sensitive", "after_sensitive"] {
    if let Some(markers) = obj.get(phase).and_then(Value::as_object) {
      collect_sensitive_keys(markers, "", &mut sensitive_keys);
    }
  }

  let mut out = Map::new();
  for (key, value) in obj {
    if key == "before_sensitive" || key == "after_sensitive" {
      continue;
    }
    match value {
      Value::Object(map) => {
        out.insert(key.clone(), redact_map(map, &sensitive_keys, ""));
      }
      other => {
        out.insert(key.clone(), other.clone());
      }
    }
  }
  Value::Object(out)
}

/// Pattern-only scrub for value blocks with no marker maps
/// (e.g. planned_values resources).
pub fn redact_object(value: &Value) -> Value {
  match value.as_object() {
    Some(map) => redact_map(map, &HashSet::new(), ""),
    None => value.clone(),
  }
}

fn collect_sensitive_keys(markers: &Map<String, Value>, prefix: &str, out: &mut HashSet<String>) {
  for (key, val) in markers {
    let full_key = join_key(prefix, key);
    match val {
      Value::Bool(true) => {
        out.insert(full_key);
      }
      Value::Object(nested) => collect_sensitive_keys(nested, &full_key, out),
      _ => {}
    }
  }
}

fn redact_map(map: &Map<String, Value>, sensitive_keys: &HashSet<String>, prefix: &str) -> Value {
  let mut out = Map::new();
  for (key, val) in map {
    let full_key = join_key(prefix, key);
    if sensitive_keys.contains(&full_key) || is_sensitive_key(key) {
      out.insert(key.clone(), Value::String(REDACTED.to_string()));
    } else if let Value::Object(nested) = val {
      out.insert(key.clone(), redact_map(nested, sensitive_keys, &full_key));
    } else {
      out.insert(key.clone(), val.clone());
    }
  }
  Value::Object(out)
}

fn join_key(prefix: &str, key: &str) -> String {
  if prefix.is_empty() {
    key.to_string()
  } else {
    format!("{}.{}", prefix, key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn password_key_redacted() {
    let change = json!({"after": {"db_password": "secret123", "name": "mydb"}});
    let result = redact_change_block(&change);
    assert_eq!(result["after"]["db_password"], "[REDACTED]");
    assert_eq!(result["after"]["name"], "mydb");
  }

  #[test]
  fn token_key_redacted() {
    let change = json!({"after": {"api_token": "tok_abc", "region": "us-east-1"}});
    let result = redact_change_block(&change);
    assert_eq!(result["after"]["api_token"], "[REDACTED]");
    assert_eq!(result["after"]["region"], "us-east-1");
  }

  #[test]
  fn sensitive_markers_honored() {
    let change = json!({
      "after": {"connection_string": "postgres://u:p@host/db", "name": "mydb"},
      "after_sensitive": {"connection_string": true}
    });
    let result = redact_change_block(&change);
    assert_eq!(result["after"]["connection_string"], "[REDACTED]");
    assert_eq!(result["after"]["name"], "mydb");
    assert!(result.get("after_sensitive").is_none());
  }

  #[test]
  fn nested_values_redacted() {
    let change = json!({"after": {"config": {"secret_key": "abc", "timeout": 30}}});
    let result = redact_change_block(&change);
    assert_eq!(result["after"]["config"]["secret_key"], "[REDACTED]");
    assert_eq!(result["after"]["config"]["timeout"], 30);
  }

  #[test]
  fn non_sensitive_preserved() {
    let change = json!({"after": {"name": "myapp", "region": "us-west-2"}});
    let result = redact_change_block(&change);
    assert_eq!(result["after"]["name"], "myapp");
    assert_eq!(result["after"]["region"], "us-west-2");
  }

  #[test]
  fn nested_marker_keys() {
    let change = json!({
      "after": {"auth": {"cert": "PEM...", "cn": "svc"}},
      "after_sensitive": {"auth": {"cert": true}}
    });
    let result = redact_change_block(&change);
    assert_eq!(result["after"]["auth"]["cert"], "[REDACTED]");
    assert_eq!(result["after"]["auth"]["cn"], "svc");
  }

  #[test]
  fn redact_object_scrubs_by_pattern_only() {
    let values = json!({"access_key_id": "AKIA...", "instance_type": "t3.micro"});
    let result = redact_object(&values);
    assert_eq!(result["access_key_id"], "[REDACTED]");
    assert_eq!(result["instance_type"], "t3.micro");
  }

  #[test]
  fn non_object_passes_through() {
    assert_eq!(redact_object(&json!(null)), json!(null));
    assert_eq!(redact_change_block(&json!("x")), json!("x"));
  }
}
