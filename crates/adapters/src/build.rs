// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build system adapter.
//!
//! The build system is driven through its own CLI (`evergreen`); this
//! adapter spawns it, bounds each call with a timeout, and extracts the
//! patch id / status from its human-oriented stdout.

use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// `evergreen patch` can wait on server-side validation; status queries are quick.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(120);
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

#[allow(clippy::expect_used)]
static PATCH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ID : ([a-z0-9]+)").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static PATCH_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Status : ([a-z]+)").expect("constant regex pattern is valid"));

/// Errors from build system operations
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed:\n output: {stdout}\n error: {stderr}")]
    CommandFailed {
        command: String,
        stdout: String,
        stderr: String,
    },
    #[error("`{command}` produced unrecognized output: {snippet}")]
    MalformedOutput { command: String, snippet: String },
    #[error("`{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
}

/// Adapter for submitting and querying asynchronous build jobs
#[async_trait]
pub trait BuildSystem: Send + Sync {
    /// Submit one task; returns the build system's opaque patch id.
    /// The description must be unique per invocation to defeat
    /// server-side deduplication.
    async fn submit(&self, task: &str, description: &str) -> Result<String, BuildError>;

    /// Query the raw status string for a previously submitted patch.
    async fn status(&self, patch_id: &str) -> Result<String, BuildError>;
}

/// Drives the `evergreen` CLI as a subprocess.
pub struct EvergreenCli {
    program: String,
    project: String,
    variant: String,
    workdir: PathBuf,
}

impl EvergreenCli {
    pub fn new(project: impl Into<String>, variant: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: "evergreen".to_string(),
            project: project.into(),
            variant: variant.into(),
            workdir: workdir.into(),
        }
    }

    pub fn from_config(config: &pw_core::Config) -> Self {
        Self::new(
            config.build_project.clone(),
            config.build_variant.clone(),
            config.local_repo.clone(),
        )
    }

    async fn run_capture(
        &self,
        args: &[&str],
        in_workdir: bool,
        timeout: Duration,
    ) -> Result<String, BuildError> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(%command, "running build system CLI");

        let mut cmd = Command::new(&self.program);
        cmd.args(args).stdin(Stdio::null());
        if in_workdir {
            cmd.current_dir(&self.workdir);
        }

        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| BuildError::Timeout { command: command.clone(), secs: timeout.as_secs() })?
            .map_err(|source| BuildError::Spawn { program: self.program.clone(), source })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(BuildError::CommandFailed {
                command,
                stdout,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(stdout)
    }
}

#[async_trait]
impl BuildSystem for EvergreenCli {
    async fn submit(&self, task: &str, description: &str) -> Result<String, BuildError> {
        let args = [
            "patch", "-p", self.project.as_str(), "-v", self.variant.as_str(), "-t", task,
            "-d", description, "-y", "-u", "-f",
        ];
        let stdout = self.run_capture(&args, true, SUBMIT_TIMEOUT).await?;
        parse_patch_id(&stdout).ok_or_else(|| BuildError::MalformedOutput {
            command: format!("{} patch -t {}", self.program, task),
            snippet: snippet(&stdout),
        })
    }

    async fn status(&self, patch_id: &str) -> Result<String, BuildError> {
        let args = ["list-patches", "-i", patch_id];
        let stdout = self.run_capture(&args, false, STATUS_TIMEOUT).await?;
        parse_status(&stdout).ok_or_else(|| BuildError::MalformedOutput {
            command: format!("{} list-patches -i {}", self.program, patch_id),
            snippet: snippet(&stdout),
        })
    }
}

/// Extract the patch id from `evergreen patch` stdout.
fn parse_patch_id(stdout: &str) -> Option<String> {
    PATCH_ID.captures(stdout).map(|c| c[1].to_string())
}

/// Extract the status from `evergreen list-patches` stdout.
fn parse_status(stdout: &str) -> Option<String> {
    PATCH_STATUS.captures(stdout).map(|c| c[1].to_string())
}

fn snippet(stdout: &str) -> String {
    stdout.chars().take(200).collect()
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{BuildError, BuildSystem};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    /// Recorded submission
    #[derive(Debug, Clone)]
    pub struct SubmitCall {
        pub task: String,
        pub description: String,
    }

    struct FakeBuildState {
        next_id: u64,
        submissions: Vec<SubmitCall>,
        statuses: HashMap<String, String>,
        status_queries: Vec<String>,
        failing_tasks: Vec<String>,
        delays_ms: HashMap<String, u64>,
        hang_status_for: Vec<String>,
    }

    /// Fake build system for testing.
    ///
    /// Patch ids are assigned in completion order (`p1`, `p2`, ...), so a
    /// per-task submit delay lets tests invert completion order relative
    /// to submission order.
    #[derive(Clone)]
    pub struct FakeBuildSystem {
        inner: Arc<Mutex<FakeBuildState>>,
    }

    impl Default for FakeBuildSystem {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeBuildState {
                    next_id: 0,
                    submissions: Vec::new(),
                    statuses: HashMap::new(),
                    status_queries: Vec::new(),
                    failing_tasks: Vec::new(),
                    delays_ms: HashMap::new(),
                    hang_status_for: Vec::new(),
                })),
            }
        }
    }

    impl FakeBuildSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Delay this task's submission, shifting its completion order.
        pub fn delay_submit(&self, task: &str, ms: u64) {
            self.inner.lock().delays_ms.insert(task.to_string(), ms);
        }

        /// Make submissions of this task fail.
        pub fn fail_submission(&self, task: &str) {
            self.inner.lock().failing_tasks.push(task.to_string());
        }

        /// Set the raw status returned for a patch id.
        pub fn set_status(&self, patch_id: &str, raw: &str) {
            self.inner.lock().statuses.insert(patch_id.to_string(), raw.to_string());
        }

        /// Make status queries for this patch id hang past any sane timeout.
        pub fn hang_status(&self, patch_id: &str) {
            self.inner.lock().hang_status_for.push(patch_id.to_string());
        }

        /// All recorded submissions, in completion order.
        pub fn submissions(&self) -> Vec<SubmitCall> {
            self.inner.lock().submissions.clone()
        }

        /// All patch ids that were status-queried, in call order.
        pub fn status_queries(&self) -> Vec<String> {
            self.inner.lock().status_queries.clone()
        }
    }

    #[async_trait]
    impl BuildSystem for FakeBuildSystem {
        async fn submit(&self, task: &str, description: &str) -> Result<String, BuildError> {
            let delay = self.inner.lock().delays_ms.get(task).copied().unwrap_or(0);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            let mut state = self.inner.lock();
            if state.failing_tasks.iter().any(|t| t == task) {
                return Err(BuildError::CommandFailed {
                    command: format!("fake patch -t {task}"),
                    stdout: String::new(),
                    stderr: "rejected".to_string(),
                });
            }
            state.next_id += 1;
            let id = format!("p{}", state.next_id);
            state.submissions.push(SubmitCall {
                task: task.to_string(),
                description: description.to_string(),
            });
            Ok(id)
        }

        async fn status(&self, patch_id: &str) -> Result<String, BuildError> {
            let hang = {
                let mut state = self.inner.lock();
                state.status_queries.push(patch_id.to_string());
                state.hang_status_for.iter().any(|p| p == patch_id)
            };
            if hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            let state = self.inner.lock();
            match state.statuses.get(patch_id) {
                Some(raw) => Ok(raw.clone()),
                None => Err(BuildError::CommandFailed {
                    command: format!("fake list-patches -i {patch_id}"),
                    stdout: String::new(),
                    stderr: "no such patch".to_string(),
                }),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBuildSystem, SubmitCall};

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
