// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const SUBMIT_OUTPUT: &str = "\
         ID : 63f5a1b2c3d4e5f6a7b8c9d0
    Created : 2026-08-07 10:12:31
Description : my-branch_lint_1754556751000
      Build : https://evergreen.example.com/patch/63f5a1b2c3d4e5f6a7b8c9d0
     Status : created
";

const LIST_OUTPUT: &str = "\
ID : 63f5a1b2c3d4e5f6a7b8c9d0
Status : succeeded
";

#[test]
fn parses_patch_id_from_submit_output() {
    assert_eq!(parse_patch_id(SUBMIT_OUTPUT).as_deref(), Some("63f5a1b2c3d4e5f6a7b8c9d0"));
}

#[test]
fn parses_status_from_list_output() {
    assert_eq!(parse_status(LIST_OUTPUT).as_deref(), Some("succeeded"));
}

#[yare::parameterized(
    empty        = { "" },
    unrelated    = { "error: not signed in" },
    partial_line = { "ID missing here" },
)]
fn missing_id_returns_none(stdout: &str) {
    assert_eq!(parse_patch_id(stdout), None);
}

#[test]
fn snippet_truncates_long_output() {
    let long = "x".repeat(500);
    assert_eq!(snippet(&long).len(), 200);
}

#[tokio::test]
async fn fake_assigns_ids_in_completion_order() {
    let build = FakeBuildSystem::new();
    build.delay_submit("slow", 50);
    let (slow, fast) = tokio::join!(build.submit("slow", "d1"), build.submit("fast", "d2"));
    assert_eq!(fast.unwrap(), "p1");
    assert_eq!(slow.unwrap(), "p2");
}

#[tokio::test]
async fn fake_records_status_queries() {
    let build = FakeBuildSystem::new();
    build.set_status("p1", "started");
    assert_eq!(build.status("p1").await.unwrap(), "started");
    assert_eq!(build.status_queries(), vec!["p1".to_string()]);
}

#[tokio::test]
async fn fake_fails_configured_submissions() {
    let build = FakeBuildSystem::new();
    build.fail_submission("lint");
    assert!(build.submit("lint", "d").await.is_err());
}

#[tokio::test]
async fn spawn_error_for_missing_program() {
    let mut cli = EvergreenCli::new("proj", "variant", "/tmp");
    cli.program = "definitely-not-a-real-binary-pw".to_string();
    let err = cli.status("abc").await.unwrap_err();
    assert!(matches!(err, BuildError::Spawn { .. }));
}
