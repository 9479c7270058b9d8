//! Integration tests for the file-backed fix store.

use fix_store::{Fix, FixStore};

#[test]
fn round_trip_through_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("fixes.json");

  {
    let mut store = FixStore::open(&path).unwrap();
    assert!(store.is_empty());
    store
      .save(
        Fix::new("IAM role deletion broke Lambda functions", "Recreated role with matching policy")
          .with_tags("aws_iam_role,aws,iam")
          .with_error_excerpt("AccessDenied: sts:AssumeRole"),
      )
      .unwrap();
    store
      .save(Fix::new("SG rule conflict on 443", "Merged ingress rules").with_tags("aws_security_group, networking"))
      .unwrap();
  }

  let store = FixStore::open(&path).unwrap();
  assert_eq!(store.len(), 2);

  let iam = store.find_by_resource_type("aws_iam_role");
  assert_eq!(iam.len(), 1);
  assert_eq!(iam[0].error_excerpt.as_deref(), Some("AccessDenied: sts:AssumeRole"));

  assert_eq!(store.search("lambda", false).len(), 1);
  assert_eq!(store.search("lambda ingress", true).len(), 2);
}

#[test]
fn delete_persists() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("fixes.json");

  let short = {
    let mut store = FixStore::open(&path).unwrap();
    let fix = Fix::new("boom", "fixed");
    let short = fix.short_id();
    store.save(fix).unwrap();
    store.delete(&short).unwrap();
    short
  };

  let store = FixStore::open(&path).unwrap();
  assert!(store.is_empty());
  assert!(store.get(&short).is_err());
}

#[test]
fn open_missing_file_is_empty_store() {
  let dir = tempfile::tempdir().unwrap();
  let store = FixStore::open(dir.path().join("nope.json")).unwrap();
  assert!(store.is_empty());
}

#[test]
fn parses_records_without_generated_fields() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("fixes.json");
  std::fs::write(&path, r#"[{"issue": "boom", "resolution": "fixed", "tags": "iam"}]"#).unwrap();

  let store = FixStore::open(&path).unwrap();
  assert_eq!(store.len(), 1);
  assert!(!store.all()[0].id.is_empty());
}
