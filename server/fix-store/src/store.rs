//! JSON-file-backed fix collection with prefix lookup and search.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::model::Fix;

/// Flat collection of fixes. File-backed stores persist on every mutation;
/// in-memory stores never touch disk.
#[derive(Debug)]
pub struct FixStore {
  path: Option<PathBuf>,
  fixes: Vec<Fix>,
}

impl FixStore {
  /// Open a file-backed store. A missing file is an empty store.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
    let path = path.into();
    let fixes = match fs::read_to_string(&path) {
      Ok(raw) if raw.trim().is_empty() => Vec::new(),
      Ok(raw) => serde_json::from_str(&raw)?,
      Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
      Err(e) => return Err(e.into()),
    };
    Ok(Self { path: Some(path), fixes })
  }

  pub fn in_memory() -> Self {
    Self { path: None, fixes: Vec::new() }
  }

  pub fn from_fixes(fixes: Vec<Fix>) -> Self {
    Self { path: None, fixes }
  }

  /// Insert or replace (by id), then persist if file-backed.
  pub fn save(&mut self, fix: Fix) -> Result<(), StoreError> {
    match self.fixes.iter_mut().find(|f| f.id == fix.id) {
      Some(slot) => *slot = fix,
      None => self.fixes.push(fix),
    }
    self.persist()
  }

  pub fn all(&self) -> &[Fix] {
    &self.fixes
  }

  pub fn len(&self) -> usize {
    self.fixes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fixes.is_empty()
  }

  /// Look up a fix by full id or unique id prefix.
  pub fn get(&self, id_or_prefix: &str) -> Result<&Fix, StoreError> {
    let mut hits = self.fixes.iter().filter(|f| f.id.starts_with(id_or_prefix));
    match (hits.next(), hits.next()) {
      (None, _) => Err(StoreError::NotFound(id_or_prefix.to_string())),
      (Some(fix), None) => Ok(fix),
      (Some(_), Some(_)) => Err(StoreError::AmbiguousId(id_or_prefix.to_string())),
    }
  }

  /// Remove a fix by full id or unique id prefix; returns the removed record.
  pub fn delete(&mut self, id_or_prefix: &str) -> Result<Fix, StoreError> {
    let id = self.get(id_or_prefix)?.id.clone();
    let idx = self
      .fixes
      .iter()
      .position(|f| f.id == id)
      .ok_or_else(|| StoreError::NotFound(id_or_prefix.to_string()))?;
    let fix = self.fixes.remove(idx);
    self.persist()?;
    Ok(fix)
  }

  /// All fixes tagged with the given resource type.
  pub fn find_by_resource_type(&self, resource_type: &str) -> Vec<&Fix> {
    self
      .fixes
      .iter()
      .filter(|f| f.matches_resource_type(resource_type))
      .collect()
  }

  /// Keyword search across all fixes (AND by default, OR with `match_any`).
  pub fn search(&self, query: &str, match_any: bool) -> Vec<&Fix> {
    self.fixes.iter().filter(|f| f.matches(query, match_any)).collect()
  }

  fn persist(&self) -> Result<(), StoreError> {
    if let Some(path) = &self.path {
      if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
      }
      let raw = serde_json::to_string_pretty(&self.fixes)?;
      fs::write(path, raw)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn in_memory_save_and_query() {
    let mut store = FixStore::in_memory();
    store
      .save(Fix::new("IAM role issue", "Fixed it").with_tags("aws_iam_role, iam"))
      .unwrap();
    store
      .save(Fix::new("SG issue", "Fixed it").with_tags("aws_security_group, networking"))
      .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.find_by_resource_type("aws_iam_role").len(), 1);
    assert_eq!(store.find_by_resource_type("aws_rds_instance").len(), 0);
    assert_eq!(store.search("issue", false).len(), 2);
    assert_eq!(store.search("role fixed", false).len(), 1);
  }

  #[test]
  fn save_replaces_by_id() {
    let mut store = FixStore::in_memory();
    let mut fix = Fix::new("original", "fix");
    let id = fix.id.clone();
    store.save(fix.clone()).unwrap();

    fix.issue = "revised".to_string();
    store.save(fix).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&id).unwrap().issue, "revised");
  }

  #[test]
  fn get_by_prefix() {
    let mut store = FixStore::in_memory();
    let fix = Fix::new("boom", "fixed");
    let short = fix.short_id();
    store.save(fix).unwrap();

    assert_eq!(store.get(&short).unwrap().issue, "boom");
    assert!(matches!(store.get("zzzzzzzz"), Err(StoreError::NotFound(_))));
  }

  #[test]
  fn delete_removes_and_returns() {
    let mut store = FixStore::in_memory();
    let fix = Fix::new("boom", "fixed");
    let short = fix.short_id();
    store.save(fix).unwrap();

    let removed = store.delete(&short).unwrap();
    assert_eq!(removed.issue, "boom");
    assert!(store.is_empty());
  }
}
