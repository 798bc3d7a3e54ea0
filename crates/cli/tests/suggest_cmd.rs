//! CLI tests for the `cmdtree suggest` subcommand.

use std::process::Command;

use assert_cmd::cargo;

fn suggest_json(args: &[&str]) -> serde_json::Value {
    let output = Command::new(cargo::cargo_bin!("cmdtree"))
        .arg("suggest")
        .args(args)
        .args(["--output", "json"])
        .output()
        .expect("run cmdtree");
    assert!(output.status.success(), "suggest failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn texts(json: &serde_json::Value) -> Vec<String> {
    json["suggestions"]
        .as_array()
        .expect("suggestions array")
        .iter()
        .map(|s| s["text"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn root_prefix_completes_literals() {
    let json = suggest_json(&["t"]);
    assert_eq!(texts(&json), ["toggle", "tp"]);
    assert_eq!(json["range"], serde_json::json!({ "start": 0, "end": 1 }));
}

#[test]
fn player_argument_completes_roster() {
    let json = suggest_json(&["execute as "]);
    assert_eq!(texts(&json), ["alice", "bob", "carol"]);
    assert_eq!(json["range"], serde_json::json!({ "start": 11, "end": 11 }));
}

#[test]
fn boolean_argument_completes_values() {
    let json = suggest_json(&["toggle f"]);
    assert_eq!(texts(&json), ["false"]);
}

#[test]
fn cursor_flag_completes_mid_input() {
    let json = suggest_json(&["execute as bob", "--cursor", "9"]);
    assert_eq!(texts(&json), ["as"]);
    assert_eq!(json["range"], serde_json::json!({ "start": 8, "end": 9 }));
}

#[test]
fn nothing_to_suggest_is_empty() {
    let json = suggest_json(&["whoami "]);
    assert!(texts(&json).is_empty());
}

#[test]
fn cursor_past_end_is_rejected() {
    let output = Command::new(cargo::cargo_bin!("cmdtree"))
        .args(["suggest", "say", "--cursor", "10"])
        .output()
        .expect("run cmdtree");
    assert!(!output.status.success());
}
