// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation engine.
//!
//! Re-reads every ledger comment on a review, refreshes the status of
//! non-terminal records against the build system, and overwrites a ledger
//! only when something actually changed. Unchanged ledgers produce zero
//! writes, so repeated runs converge instead of churning edit history.

use futures_util::future::join_all;
use pw_adapters::{BuildSystem, IssueTracker, Review, TrackerError};
use pw_core::{ledger, PatchRecord, PatchStatus};
use std::time::Duration;
use thiserror::Error;

/// One slow patch must not block status refresh of the rest; a timed-out
/// record stays pending and is retried on the next run.
pub const STATUS_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Sentinel-tagged comments seen.
    pub ledgers: usize,
    /// Ledgers skipped because their body failed to decode.
    pub skipped: usize,
    /// Ledgers rewritten because a status changed.
    pub updated: usize,
}

/// Reconcile every ledger comment on the review.
///
/// A malformed ledger is reported and skipped; the others still process.
/// This path never creates comments, it only overwrites existing ones.
pub async fn reconcile(
    tracker: &dyn IssueTracker,
    build: &dyn BuildSystem,
    review: &Review,
) -> Result<ReconcileSummary, ReconcileError> {
    let publisher = super::LedgerPublisher::new(tracker);
    let mut summary = ReconcileSummary::default();

    for comment in publisher.list(review.number).await? {
        if !ledger::is_ledger(&comment.body) {
            continue;
        }
        summary.ledgers += 1;

        let records = match ledger::decode(&comment.body) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(comment_id = comment.id, error = %e, "skipping malformed ledger");
                summary.skipped += 1;
                continue;
            }
        };

        let (records, changed) = refresh_records(build, records).await;
        if changed {
            publisher.overwrite(comment.id, &records).await?;
            summary.updated += 1;
            tracing::info!(comment_id = comment.id, "ledger updated");
        }
    }

    Ok(summary)
}

/// Refresh non-terminal records concurrently.
///
/// Returns the full sequence in its original order plus whether any status
/// changed. Terminal records are never queried. A failed or timed-out
/// query leaves that record untouched.
pub async fn refresh_records(
    build: &dyn BuildSystem,
    records: Vec<PatchRecord>,
) -> (Vec<PatchRecord>, bool) {
    let refreshed = join_all(records.into_iter().map(|record| async move {
        if record.status.is_terminal() {
            return (record, false);
        }
        match tokio::time::timeout(STATUS_QUERY_TIMEOUT, build.status(&record.patch_id)).await {
            Ok(Ok(raw)) => {
                let status = PatchStatus::from_raw(&raw);
                let changed = status != record.status;
                (PatchRecord { status, ..record }, changed)
            }
            Ok(Err(e)) => {
                tracing::warn!(patch_id = %record.patch_id, error = %e, "status query failed; will retry next run");
                (record, false)
            }
            Err(_) => {
                tracing::warn!(patch_id = %record.patch_id, "status query timed out; will retry next run");
                (record, false)
            }
        }
    }))
    .await;

    let mut any_changed = false;
    let records = refreshed
        .into_iter()
        .map(|(record, changed)| {
            any_changed |= changed;
            record
        })
        .collect();
    (records, any_changed)
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
