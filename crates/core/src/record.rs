// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One patch submission: task name, build-system id, status link.

use crate::status::PatchStatus;
use serde::{Deserialize, Deserializer, Serialize};

/// A single task's submission record inside a ledger.
///
/// Field names follow the persisted wire format so ledgers stay readable
/// and editable on the review thread itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub task: String,
    #[serde(rename = "jobId")]
    pub patch_id: String,
    pub link: String,
    /// Missing on records written before a first reconciliation pass, and
    /// older tooling stored the build system's raw string. Both decode as
    /// the normalized status.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: PatchStatus,
}

impl PatchRecord {
    /// A freshly submitted record, not yet reconciled.
    pub fn pending(task: impl Into<String>, patch_id: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            patch_id: patch_id.into(),
            link: link.into(),
            status: PatchStatus::Pending,
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<PatchStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(PatchStatus::from_raw(&raw))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
