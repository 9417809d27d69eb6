// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential resolution for the issue tracker.
//!
//! Resolution walks a fallback chain and returns the first token found:
//!
//! ```text
//!   1. PW_GITHUB_TOKEN env var
//!   2. GITHUB_TOKEN env var
//!   3. macOS Keychain (service "github", account "token")
//!   4. ~/.config/patchwork/credentials.json → token
//! ```
//!
//! Interactive prompting on a miss is the CLI's job; this module only
//! resolves and persists. A missing token is fatal before any network
//! call is attempted.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no tracker token found; set PW_GITHUB_TOKEN or run `pw create` to be prompted")]
    Missing,
    #[error("cannot persist token to {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve a tracker token from the host environment.
///
/// Walks the fallback chain and returns the first non-empty token.
pub fn resolve() -> Option<String> {
    for var in ["PW_GITHUB_TOKEN", "GITHUB_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.is_empty() {
                return Some(token);
            }
        }
    }

    #[cfg(target_os = "macos")]
    if let Some(token) = read_keychain_token() {
        return Some(token);
    }

    read_credentials_file()
}

/// Persist a token so future runs skip the prompt.
///
/// Always writes the credentials file; on macOS the keychain is updated
/// too (failure there only logs, the file copy is authoritative).
pub fn store(token: &str) -> Result<(), CredentialError> {
    let Some(path) = credentials_path() else {
        return Err(CredentialError::Missing);
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| CredentialError::Store { path: path.clone(), source })?;
    }
    let body = serde_json::json!({ "token": token }).to_string();
    std::fs::write(&path, body)
        .map_err(|source| CredentialError::Store { path: path.clone(), source })?;

    #[cfg(target_os = "macos")]
    write_keychain_token(token);

    Ok(())
}

/// Read the token from the macOS Keychain.
#[cfg(target_os = "macos")]
fn read_keychain_token() -> Option<String> {
    let output = std::process::Command::new("security")
        .args(["find-generic-password", "-s", "github", "-a", "token", "-w"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let raw = String::from_utf8(output.stdout).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.to_string())
}

#[cfg(target_os = "macos")]
fn write_keychain_token(token: &str) {
    let status = std::process::Command::new("security")
        .args(["add-generic-password", "-U", "-s", "github", "-a", "token", "-w", token])
        .status();
    if !matches!(status, Ok(s) if s.success()) {
        tracing::warn!("could not save token to keychain; using credentials file only");
    }
}

/// Read the token from `~/.config/patchwork/credentials.json`.
fn read_credentials_file() -> Option<String> {
    let path = credentials_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    value
        .get("token")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Resolve `~/.config/patchwork/credentials.json`.
fn credentials_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("patchwork").join("credentials.json"))
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
