// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the build system, the issue tracker, and
//! credential resolution.

pub mod build;
pub mod credential;
pub mod tracker;

pub use build::{BuildError, BuildSystem, EvergreenCli};
pub use credential::CredentialError;
pub use tracker::{GithubTracker, IssueTracker, Review, ReviewComment, TrackerError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use build::{FakeBuildSystem, SubmitCall};
#[cfg(any(test, feature = "test-support"))]
pub use tracker::FakeTracker;
