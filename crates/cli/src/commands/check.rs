// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pw check`: reconcile every recorded batch against live patch status.

use anyhow::Result;
use pw_adapters::{EvergreenCli, GithubTracker};
use pw_core::Config;

pub async fn run(config: &Config, key: Option<&str>) -> Result<()> {
    let token = crate::auth::acquire_token()?;
    let tracker = GithubTracker::new(token, config.repo_owner.clone(), config.repo_name.clone())?;

    let review = pw_engine::resolve_review(&tracker, config, key).await?;
    let build = EvergreenCli::from_config(config);
    let summary = pw_engine::reconcile(&tracker, &build, &review).await?;

    if summary.ledgers == 0 {
        println!("No patch batches recorded on {}", review.url);
        return Ok(());
    }
    println!("{} batch(es) checked, {} updated", summary.ledgers, summary.updated);
    if summary.skipped > 0 {
        eprintln!("warning: {} malformed batch comment(s) skipped", summary.skipped);
    }
    Ok(())
}
