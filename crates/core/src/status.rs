// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Patch status state machine.

use serde::{Deserialize, Serialize};

/// Status of a submitted patch build.
///
/// `Pending` covers every non-terminal state the build system reports
/// (created, started, scheduled, ...). Once a patch reaches a terminal
/// state it is frozen: reconciliation never queries it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl PatchStatus {
    /// Normalize a raw status string from the build system.
    ///
    /// Unrecognized strings map to `Pending` ("not yet known, try again
    /// next time"), never to an error.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "succeeded" => PatchStatus::Succeeded,
            "failed" => PatchStatus::Failed,
            _ => PatchStatus::Pending,
        }
    }

    /// Terminal statuses are never re-queried once persisted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PatchStatus::Succeeded | PatchStatus::Failed)
    }
}

impl std::fmt::Display for PatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PatchStatus::Pending => "pending",
            PatchStatus::Succeeded => "succeeded",
            PatchStatus::Failed => "failed",
        })
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
