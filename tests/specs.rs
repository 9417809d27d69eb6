// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Workspace-level integration tests: drive the full create-then-check
//! lifecycle over the fake adapters, plus the CLI surface itself.

use pw_adapters::{FakeBuildSystem, FakeTracker, Review};
use pw_core::{ledger, Config, FakeClock, PatchStatus};

fn config() -> Config {
    Config {
        repo_owner: "10gen".into(),
        repo_name: "mms".into(),
        ticket_prefix: "CLOUDP-".into(),
        build_project: "mms".into(),
        build_variant: "e2e_backup".into(),
        local_repo: "/tmp".into(),
        status_base_url: "https://ci.example.com/patch".into(),
        form_port: 8081,
        build_config: ".evergreen.yml".into(),
    }
}

fn tasks(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn create_then_check_lifecycle() {
    let build = FakeBuildSystem::new();
    let tracker = FakeTracker::new().with_review("CLOUDP-1", 42);
    let review = Review { number: 42, url: "https://github.example.com/pull/42".into() };
    let clock = FakeClock::new();
    let config = config();

    // Create: two tasks become one ledger comment with two pending records.
    let (comment_id, records) = pw_engine::create_ledger(
        &build,
        &tracker,
        &clock,
        &config,
        &review,
        "CLOUDP-1",
        &tasks(&["lint", "unit"]),
    )
    .await
    .unwrap();

    assert_eq!(tracker.create_calls(), 1);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].task, "lint");
    assert_eq!(records[0].link, format!("https://ci.example.com/patch/{}", records[0].patch_id));
    assert!(records.iter().all(|r| r.status == PatchStatus::Pending));

    // Check: one task finished, the other is still running.
    build.set_status(&records[0].patch_id, "succeeded");
    build.set_status(&records[1].patch_id, "started");

    let summary = pw_engine::reconcile(&tracker, &build, &review).await.unwrap();
    assert_eq!(summary.updated, 1);

    let persisted = ledger::decode(&tracker.comment_body(comment_id).unwrap()).unwrap();
    assert_eq!(persisted[0].status, PatchStatus::Succeeded);
    assert_eq!(persisted[1].status, PatchStatus::Pending);
    assert_eq!(persisted[0].task, "lint");
    assert_eq!(persisted[1].task, "unit");

    // Check again with no news: nothing is written.
    let summary = pw_engine::reconcile(&tracker, &build, &review).await.unwrap();
    assert_eq!(summary.updated, 0);
    assert_eq!(tracker.update_calls().len(), 1);
}

#[tokio::test]
async fn ambiguous_thread_aborts_before_any_write() {
    let tracker = FakeTracker::new().with_duplicate_reviews("CLOUDP-9");
    let config = config();

    let err = pw_engine::resolve_review(&tracker, &config, Some("9")).await.unwrap_err();
    assert!(err.to_string().contains("not found or ambiguous"));
    assert_eq!(tracker.create_calls(), 0);
    assert!(tracker.update_calls().is_empty());
}

#[tokio::test]
async fn failed_submission_leaves_the_thread_untouched() {
    let build = FakeBuildSystem::new();
    build.fail_submission("unit");
    let tracker = FakeTracker::new().with_review("CLOUDP-1", 42);
    let review = Review { number: 42, url: "u".into() };

    let err = pw_engine::create_ledger(
        &build,
        &tracker,
        &FakeClock::new(),
        &config(),
        &review,
        "CLOUDP-1",
        &tasks(&["lint", "unit"]),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("unit"));
    assert_eq!(tracker.create_calls(), 0);
}

mod cli {
    use assert_cmd::Command;

    #[test]
    fn help_lists_both_commands() {
        let output = Command::cargo_bin("pw").unwrap().arg("--help").output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        assert!(stdout.contains("create"));
        assert!(stdout.contains("check"));
    }

    #[test]
    fn missing_config_fails_with_the_path_in_the_message() {
        let output = Command::cargo_bin("pw")
            .unwrap()
            .arg("check")
            .env("PW_CONFIG", "/nonexistent/patchwork.toml")
            .output()
            .unwrap();
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        assert!(stderr.contains("/nonexistent/patchwork.toml"));
    }

    #[test]
    fn config_flag_overrides_the_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patchwork.toml");
        std::fs::write(&path, "repo_owner = \"x\"\n").unwrap();
        let output = Command::cargo_bin("pw")
            .unwrap()
            .args(["check", "--config"])
            .arg(&path)
            .env("PW_CONFIG", "/elsewhere/ignored.toml")
            .output()
            .unwrap();
        assert!(!output.status.success());
        // Partial config: the parse error names the flag's file, not the env one.
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        assert!(stderr.contains("patchwork.toml"));
        assert!(!stderr.contains("ignored.toml"));
    }
}
