// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool configuration.
//!
//! Everything that was a per-developer constant in earlier iterations of
//! this tool (repo coordinates, build project, local checkout path) lives
//! in a TOML file and is passed into each component explicitly; nothing
//! reads process-wide state.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Owner of the repository carrying the review threads.
    pub repo_owner: String,
    /// Repository name.
    pub repo_name: String,
    /// Prefix mapping an explicit ticket key to a branch name, e.g.
    /// "CLOUDP-" so that `pw check 1234` resolves branch `CLOUDP-1234`.
    /// Empty means keys are used as branch names verbatim.
    #[serde(default)]
    pub ticket_prefix: String,
    /// Build system project key (`evergreen patch -p ...`).
    pub build_project: String,
    /// Build variant; also the tag that selects offerable tasks.
    pub build_variant: String,
    /// Local working copy the branch is read from and submissions run in.
    pub local_repo: PathBuf,
    /// Base URL of the build system's patch status pages.
    pub status_base_url: String,
    /// Port for the transient task-selection form.
    #[serde(default = "default_form_port")]
    pub form_port: u16,
    /// Build-config file, relative to `local_repo`, listing task definitions.
    #[serde(default = "default_build_config")]
    pub build_config: String,
}

fn default_form_port() -> u16 {
    8081
}

fn default_build_config() -> String {
    ".evergreen.yml".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// `owner/name` form used in tracker search queries.
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// Deterministic status-page link for a submitted patch.
    pub fn patch_link(&self, patch_id: &str) -> String {
        format!("{}/{}", self.status_base_url.trim_end_matches('/'), patch_id)
    }

    /// Branch name for an explicit ticket key, or `None` to use the
    /// current branch of the local working copy.
    pub fn branch_for_key(&self, key: Option<&str>) -> Option<String> {
        key.map(|k| format!("{}{}", self.ticket_prefix, k))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
