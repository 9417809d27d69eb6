// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear_env() {
    std::env::remove_var("PW_GITHUB_TOKEN");
    std::env::remove_var("GITHUB_TOKEN");
}

#[test]
#[serial]
fn env_var_wins_over_everything() {
    clear_env();
    std::env::set_var("PW_GITHUB_TOKEN", "tok-env");
    assert_eq!(resolve().as_deref(), Some("tok-env"));
    clear_env();
}

#[test]
#[serial]
fn empty_env_var_is_skipped() {
    clear_env();
    std::env::set_var("PW_GITHUB_TOKEN", "");
    std::env::set_var("GITHUB_TOKEN", "tok-fallback");
    assert_eq!(resolve().as_deref(), Some("tok-fallback"));
    clear_env();
}

#[test]
#[serial]
fn store_then_resolve_round_trips_through_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let original_home = std::env::var("HOME").ok();
    std::env::set_var("HOME", dir.path());

    store("tok-file").unwrap();
    assert_eq!(resolve().as_deref(), Some("tok-file"));

    let raw = std::fs::read_to_string(
        dir.path().join(".config").join("patchwork").join("credentials.json"),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["token"], "tok-file");

    if let Some(home) = original_home {
        std::env::set_var("HOME", home);
    }
}

#[test]
#[serial]
fn missing_everything_resolves_none() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let original_home = std::env::var("HOME").ok();
    std::env::set_var("HOME", dir.path());

    assert_eq!(resolve(), None);

    if let Some(home) = original_home {
        std::env::set_var("HOME", home);
    }
}

#[test]
fn missing_error_suggests_the_fix() {
    let msg = CredentialError::Missing.to_string();
    assert!(msg.contains("PW_GITHUB_TOKEN"));
}
