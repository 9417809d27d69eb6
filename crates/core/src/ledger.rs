// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger codec: persist an ordered list of patch records as one comment.
//!
//! A ledger comment is distinguished from ordinary discussion solely by its
//! sentinel first line; the rest of the body is a pretty-printed JSON array
//! so reviewers can read progress without any tooling.

use crate::record::PatchRecord;
use thiserror::Error;

/// Marker prefixed to every ledger comment. The exact string is load-bearing:
/// existing threads already carry comments tagged with it.
pub const SENTINEL: &str = "*** PATCHES ***";

/// Errors from decoding a ledger comment body.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("not a ledger comment (missing sentinel)")]
    MissingSentinel,
    #[error("malformed ledger body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// True iff the comment body starts with the exact sentinel string.
pub fn is_ledger(body: &str) -> bool {
    body.starts_with(SENTINEL)
}

/// Encode records as a sentinel-tagged, human-readable comment body.
///
/// The inverse of [`decode`] for any sequence this system produces.
pub fn encode(records: &[PatchRecord]) -> String {
    // A slice of plain string/enum fields cannot fail to serialize.
    #[allow(clippy::expect_used)]
    let json = serde_json::to_string_pretty(records).expect("record serialization is infallible");
    format!("{SENTINEL}\n{json}")
}

/// Decode a ledger comment body back into its ordered records.
pub fn decode(body: &str) -> Result<Vec<PatchRecord>, LedgerError> {
    let rest = body.strip_prefix(SENTINEL).ok_or(LedgerError::MissingSentinel)?;
    Ok(serde_json::from_str(rest)?)
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
