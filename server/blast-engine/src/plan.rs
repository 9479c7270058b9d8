//! Resource change extraction from Terraform-style plan JSON.
//!
//! Produces the uniform change list the engine scores; the raw plan format
//! stays contained here. Only a structurally invalid plan is an error —
//! unknown types and actions degrade to neutral values.

use serde_json::Value;

use crate::error::AnalysisError;
use crate::redact;
use crate::types::{Action, CloudProvider, ResourceChange};

/// Parse raw plan text into JSON.
pub fn load_plan_str(raw: &str) -> Result<Value, AnalysisError> {
  Ok(serde_json::from_str(raw)?)
}

/// Extract all resources from a plan with full metadata.
///
/// Reads `resource_changes` first (most reliable for planned changes), then
/// supplements from `planned_values` for resources the change list misses;
/// those carry action `unknown` and never score. Deduplicates by address,
/// first occurrence wins.
pub fn extract_resources(plan: &Value) -> Result<Vec<ResourceChange>, AnalysisError> {
  let plan_obj = plan
    .as_object()
    .ok_or_else(|| AnalysisError::invalid_plan("plan is not a JSON object"))?;

  let changes: &[Value] = match plan_obj.get("resource_changes") {
    None => &[],
    Some(v) => v
      .as_array()
      .ok_or_else(|| AnalysisError::invalid_plan("resource_changes is not an array"))?,
  };

  let mut resources: Vec<ResourceChange> = Vec::new();

  for change in changes {
    let address = str_field(change, "address");
    let resource_type = str_field(change, "type");
    if resource_type.is_empty() {
      continue;
    }
    let name = str_field(change, "name");
    let provider_name = str_field(change, "provider_name");

    let change_block = change.get("change").cloned().unwrap_or(Value::Null);
    let actions = raw_actions(&change_block);
    let redacted = redact::redact_change_block(&change_block);
    let values = redacted.get("after").cloned().unwrap_or(Value::Null);

    resources.push(ResourceChange {
      cloud_provider: CloudProvider::detect(&resource_type, &provider_name),
      action: Action::from_raw(&actions),
      module_path: module_path(&address),
      address,
      resource_type,
      name,
      values,
    });
  }

  if let Some(planned) = plan_obj.get("planned_values") {
    extract_from_planned_values(planned, &mut resources);
  }

  // Deduplicate by address, first occurrence wins.
  let mut unique: Vec<ResourceChange> = Vec::new();
  for r in resources {
    if unique.iter().any(|u| u.address == r.address) {
      continue;
    }
    unique.push(r);
  }

  Ok(unique)
}

/// Only resources that are actually changing (not no-op/unknown).
pub fn changed_resources(resources: &[ResourceChange]) -> Vec<ResourceChange> {
  resources.iter().filter(|r| r.action.is_change()).cloned().collect()
}

fn str_field(value: &Value, key: &str) -> String {
  value.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn raw_actions(change_block: &Value) -> Vec<String> {
  change_block
    .get("actions")
    .and_then(Value::as_array)
    .map(|arr| {
      arr
        .iter()
        .filter_map(Value::as_str)
        .map(String::from)
        .collect()
    })
    .unwrap_or_default()
}

/// Module path for `module.`-prefixed addresses: the chain of
/// `module.<name>` segments, dots-joined.
fn module_path(address: &str) -> Option<String> {
  if !address.starts_with("module.") {
    return None;
  }
  let parts: Vec<&str> = address.split('.').collect();
  let mut segments: Vec<String> = Vec::new();
  let mut i = 0;
  while i + 1 < parts.len() {
    if parts[i] == "module" {
      segments.push(format!("module.{}", parts[i + 1]));
    }
    i += 1;
  }
  if segments.is_empty() {
    None
  } else {
    Some(segments.join("."))
  }
}

/// Walk `planned_values.root_module` (and child modules) for resources the
/// change list does not carry.
fn extract_from_planned_values(planned_values: &Value, resources: &mut Vec<ResourceChange>) {
  let root = match planned_values.get("root_module") {
    Some(root) => root,
    None => return,
  };
  let mut existing: Vec<String> = resources.iter().map(|r| r.address.clone()).collect();
  walk_module(root, None, resources, &mut existing);
}

fn walk_module(
  module: &Value,
  prefix: Option<&str>,
  resources: &mut Vec<ResourceChange>,
  existing: &mut Vec<String>,
) {
  if let Some(entries) = module.get("resources").and_then(Value::as_array) {
    for resource in entries {
      let address = str_field(resource, "address");
      if existing.iter().any(|a| *a == address) {
        continue;
      }
      let resource_type = str_field(resource, "type");
      if resource_type.is_empty() {
        continue;
      }
      let provider_name = str_field(resource, "provider_name");
      let values = resource
        .get("values")
        .map(redact::redact_object)
        .unwrap_or(Value::Null);

      existing.push(address.clone());
      resources.push(ResourceChange {
        cloud_provider: CloudProvider::detect(&resource_type, &provider_name),
        action: Action::Unknown,
        module_path: prefix.map(String::from),
        name: str_field(resource, "name"),
        address,
        resource_type,
        values,
      });
    }
  }

  if let Some(children) = module.get("child_modules").and_then(Value::as_array) {
    for child in children {
      let child_address = str_field(child, "address");
      walk_module(child, Some(child_address.as_str()), resources, existing);
    }
  }
}
