// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pw-engine: ledger creation and reconciliation.
//!
//! Every run starts cold: the only durable state is the ledger comment on
//! the review thread, re-read on each invocation.

pub mod publish;
pub mod reconcile;
pub mod resolve;
pub mod submit;

pub use publish::LedgerPublisher;
pub use reconcile::{reconcile, refresh_records, ReconcileError, ReconcileSummary};
pub use resolve::{current_branch, resolve_review, ResolveError};
pub use submit::{create_ledger, submit_batch, SubmitError};
