// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission controller.
//!
//! Submits a batch of tasks concurrently and assembles the resulting
//! records in the original task order, never completion order. Any single
//! submission failure fails the whole batch: a ledger that silently
//! under-represents the requested batch is worse than no ledger.

use futures_util::future::try_join_all;
use pw_adapters::{BuildError, BuildSystem, IssueTracker, Review, TrackerError};
use pw_core::{Clock, Config, PatchRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("error submitting patch for {task}: {source}")]
    Submission {
        task: String,
        #[source]
        source: BuildError,
    },
    #[error("cannot publish ledger: {0}")]
    Publish(#[from] TrackerError),
}

/// Submit every task and assemble records in submission order.
///
/// Descriptions embed the branch, task, and timestamp so the build system
/// never deduplicates two invocations of the same task.
pub async fn submit_batch(
    build: &dyn BuildSystem,
    clock: &impl Clock,
    config: &Config,
    branch: &str,
    tasks: &[String],
) -> Result<Vec<PatchRecord>, SubmitError> {
    let epoch_ms = clock.epoch_ms();
    let submissions = tasks.iter().map(|task| async move {
        let description = format!("{branch}_{task}_{epoch_ms}");
        let patch_id = build
            .submit(task, &description)
            .await
            .map_err(|source| SubmitError::Submission { task: task.clone(), source })?;
        tracing::info!(%task, %patch_id, "patch submitted");
        let link = config.patch_link(&patch_id);
        Ok::<_, SubmitError>(PatchRecord::pending(task.clone(), patch_id, link))
    });
    // try_join_all yields results in input order regardless of completion order
    try_join_all(submissions).await
}

/// Submit a batch and record it as exactly one new ledger comment.
pub async fn create_ledger(
    build: &dyn BuildSystem,
    tracker: &dyn IssueTracker,
    clock: &impl Clock,
    config: &Config,
    review: &Review,
    branch: &str,
    tasks: &[String],
) -> Result<(u64, Vec<PatchRecord>), SubmitError> {
    let records = submit_batch(build, clock, config, branch, tasks).await?;
    let publisher = super::LedgerPublisher::new(tracker);
    let comment_id = publisher.create(review.number, &records).await?;
    tracing::info!(review = review.number, comment_id, tasks = tasks.len(), "ledger created");
    Ok((comment_id, records))
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
