// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker token acquisition with an interactive fallback.
//!
//! The resolution chain itself lives in the adapters crate; this wrapper
//! adds the one interactive step (prompt once, persist the answer) and
//! keeps it out of the engine's dependency graph.

use anyhow::{Context, Result};
use pw_adapters::credential;
use std::io::Write;

/// Resolve a token, prompting once and persisting the answer on a miss.
pub fn acquire_token() -> Result<String> {
    if let Some(token) = credential::resolve() {
        return Ok(token);
    }

    let token = prompt_token()?;
    if token.is_empty() {
        return Err(credential::CredentialError::Missing.into());
    }

    match credential::store(&token) {
        Ok(()) => eprintln!("Token saved for future runs"),
        Err(e) => tracing::warn!(error = %e, "token not persisted; you will be prompted again"),
    }
    Ok(token)
}

fn prompt_token() -> Result<String> {
    eprint!("Enter your GitHub token: ");
    std::io::stderr().flush().context("cannot write prompt")?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line).context("cannot read token from stdin")?;
    Ok(line.trim().to_string())
}
