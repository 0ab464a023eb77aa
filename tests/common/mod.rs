//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use rams::core::KnowledgeBase;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a rams command isolated from the caller's environment
///
/// The user config directory points at a path that never exists, so a
/// developer's own `config.yaml` can't change what the tests see.
pub fn rams() -> Command {
    rams_with_home(&std::env::temp_dir().join("rams-tests-no-home"))
}

/// Helper to get a rams command whose user config lives under `home`
pub fn rams_with_home(home: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("rams"));
    cmd.env_remove("RAMS_SESSION")
        .env_remove("RAMS_KB")
        .env_remove("RAMS_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

/// Helper to create a session in a temp directory
pub fn setup_session() -> TempDir {
    let tmp = TempDir::new().unwrap();
    rams()
        .current_dir(tmp.path())
        .args(["init", "--name", "Unit 4 Refit", "--client", "Acme Estates"])
        .assert()
        .success();
    tmp
}

/// Helper to select activities in a session
pub fn select(tmp: &TempDir, activities: &[&str]) {
    rams()
        .current_dir(tmp.path())
        .arg("select")
        .args(activities)
        .assert()
        .success();
}

/// Register entry IDs in order, as printed when piped
pub fn entry_ids(tmp: &TempDir) -> Vec<String> {
    let output = rams()
        .current_dir(tmp.path())
        .args(["register", "list", "--output", "id"])
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

/// The bundled knowledge base
pub fn kb() -> KnowledgeBase {
    KnowledgeBase::embedded().unwrap()
}

/// Write a knowledge base YAML file into `dir`
pub fn write_kb_file(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

/// A small two-activity knowledge base
pub const SMALL_KB: &str = r#"
hazards:
  - code: live_parts
    name: Live Parts
    description: Contact with energised conductors
    category: shock
    severity: critical
  - code: trip
    name: Trip Hazard
    description: Trailing leads and offcuts
    category: secondary
    severity: low
controls:
  - code: isolate
    name: Isolate Supply
    description: Isolate and lock off
    category: elimination
    effectiveness: high
    applicable_hazards: [live_parts]
  - code: tidy
    name: Tidy Site
    description: Keep walkways clear
    category: administrative
    effectiveness: medium
    applicable_hazards: [trip]
activities:
  - code: wire_up
    name: Wire Up
    description: Terminate circuits
    category: installation
    hazards: [live_parts, trip]
    controls: [isolate, tidy]
    typical_ppe: [Gloves]
    permits_required: [Electrical Permit]
    sort_order: 2
  - code: clear_up
    name: Clear Up
    description: Remove waste
    category: maintenance
    hazards: [trip]
    controls: [tidy]
    typical_ppe: [Boots, Gloves]
    sort_order: 1
"#;
