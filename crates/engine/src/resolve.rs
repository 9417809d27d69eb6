// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread resolver.
//!
//! Maps an optional explicit ticket key (or the current working branch)
//! to the single open review thread for that branch. Zero or multiple
//! matches fail loudly rather than risk touching the wrong thread.

use pw_adapters::{IssueTracker, Review, TrackerError};
use pw_core::Config;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

const GIT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot determine current branch in {dir}: {detail}")]
    Branch { dir: String, detail: String },
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Resolve the review thread for an explicit ticket key, or for the
/// current branch of the configured working copy when no key is given.
pub async fn resolve_review(
    tracker: &dyn IssueTracker,
    config: &Config,
    key: Option<&str>,
) -> Result<Review, ResolveError> {
    let branch = match config.branch_for_key(key) {
        Some(branch) => branch,
        None => current_branch(&config.local_repo).await?,
    };
    tracing::debug!(%branch, "resolving review thread");
    Ok(tracker.find_open_review(&branch).await?)
}

/// Current branch of a local working copy.
///
/// `symbolic-ref` rather than `rev-parse` so a freshly initialized repo
/// without commits still reports its branch; a detached HEAD is an error
/// either way.
pub async fn current_branch(dir: &Path) -> Result<String, ResolveError> {
    let branch_err = |detail: String| ResolveError::Branch {
        dir: dir.display().to_string(),
        detail,
    };

    let output = tokio::time::timeout(
        GIT_TIMEOUT,
        Command::new("git")
            .args(["symbolic-ref", "--short", "HEAD"])
            .current_dir(dir)
            .stdin(Stdio::null())
            .output(),
    )
    .await
    .map_err(|_| branch_err("git timed out".to_string()))?
    .map_err(|e| branch_err(e.to_string()))?;

    if !output.status.success() {
        return Err(branch_err(String::from_utf8_lossy(&output.stderr).trim().to_string()));
    }

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if branch.is_empty() {
        return Err(branch_err("git reported an empty branch name".to_string()));
    }
    Ok(branch)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
