// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger publisher: the single write path for ledger comments.
//!
//! Both producers go through here: the submission controller to create,
//! the reconciliation engine to overwrite. Each operation is one external
//! call; there are no multi-step transactions and no rollback. A failed
//! overwrite leaves the previous body in place, and the next run retries
//! from the same snapshot.

use pw_adapters::{IssueTracker, ReviewComment, TrackerError};
use pw_core::{ledger, PatchRecord};

pub struct LedgerPublisher<'a> {
    tracker: &'a dyn IssueTracker,
}

impl<'a> LedgerPublisher<'a> {
    pub fn new(tracker: &'a dyn IssueTracker) -> Self {
        Self { tracker }
    }

    /// Post a new ledger comment; returns the comment id.
    pub async fn create(&self, review: u64, records: &[PatchRecord]) -> Result<u64, TrackerError> {
        self.tracker.create_comment(review, &ledger::encode(records)).await
    }

    /// Overwrite an existing ledger comment in full.
    pub async fn overwrite(
        &self,
        comment_id: u64,
        records: &[PatchRecord],
    ) -> Result<(), TrackerError> {
        self.tracker.update_comment(comment_id, &ledger::encode(records)).await
    }

    /// All comments on the review, ledger and otherwise.
    pub async fn list(&self, review: u64) -> Result<Vec<ReviewComment>, TrackerError> {
        self.tracker.list_comments(review).await
    }
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
