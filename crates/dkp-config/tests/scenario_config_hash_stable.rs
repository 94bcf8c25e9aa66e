//! Scenario: config hash is stable under key reordering
//!
//! Same layers -> same hash; reordered keys -> same hash; changed value or an
//! overriding layer -> different hash.

use dkp_config::{load_layered_yaml_from_strings, DkpConfig};

const BASE_YAML: &str = r#"
store:
  data_dir: "data"
ledger:
  initial_balance: 100
  attendance_bonus: 50
report:
  keys_env:
    client_id: "WCL_CLIENT_ID"
    client_secret: "WCL_CLIENT_SECRET"
"#;

const BASE_YAML_REORDERED: &str = r#"
report:
  keys_env:
    client_secret: "WCL_CLIENT_SECRET"
    client_id: "WCL_CLIENT_ID"
ledger:
  attendance_bonus: 50
  initial_balance: 100
store:
  data_dir: "data"
"#;

const OVERLAY_YAML: &str = r#"
ledger:
  attendance_bonus: 25
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.config_hash.len(), 64, "sha256 hex");
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(
        a.canonical_json, b.canonical_json,
        "canonical JSON must not depend on key order in the source"
    );
    assert_eq!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_overrides_and_changes_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let layered = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(base.config_hash, layered.config_hash);

    let cfg = DkpConfig::from_json(&layered.config_json).unwrap();
    assert_eq!(cfg.ledger.attendance_bonus, 25);
    assert_eq!(cfg.ledger.initial_balance, 100, "sibling keys survive the overlay");
}

#[test]
fn empty_layer_is_ignored() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, ""]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
}
