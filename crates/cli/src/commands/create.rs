// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pw create`: pick tasks in the browser, submit the batch, record the
//! ledger on the review thread.

use anyhow::{bail, Result};
use pw_adapters::{EvergreenCli, GithubTracker, IssueTracker};
use pw_core::{Config, SystemClock};

use crate::form::{self, FormServer};

pub async fn run(config: &Config) -> Result<()> {
    let token = crate::auth::acquire_token()?;
    let tracker = GithubTracker::new(token, config.repo_owner.clone(), config.repo_name.clone())?;

    // Resolve the review before serving the form so a missing or ambiguous
    // thread fails before anything is submitted.
    let branch = pw_engine::current_branch(&config.local_repo).await?;
    let review = tracker.find_open_review(&branch).await?;

    let tasks = crate::tasks::load_variant_tasks(config)?;
    if tasks.is_empty() {
        bail!(
            "no tasks tagged '{}' in {}",
            config.build_variant,
            config.local_repo.join(&config.build_config).display()
        );
    }

    let server = FormServer::bind(config.form_port).await?;
    println!("Pick tasks at {}", server.url);
    crate::browser::open(&server.url);

    let pending = server.collect_selection(&tasks).await?;
    println!("Submitting {} task(s)...", pending.tasks.len());

    let build = EvergreenCli::from_config(config);
    let selection = pending.tasks.clone();
    match pw_engine::create_ledger(
        &build,
        &tracker,
        &SystemClock,
        config,
        &review,
        &branch,
        &selection,
    )
    .await
    {
        Ok((_, records)) => {
            // The ledger exists either way; a lost redirect only costs a click.
            if let Err(e) = form::finish(pending, &review.url).await {
                tracing::warn!(error = %e, "browser redirect failed");
            }
            println!("Recorded {} patch(es) on {}", records.len(), review.url);
            Ok(())
        }
        Err(e) => {
            let _ = form::fail(pending, &e.to_string()).await;
            Err(e.into())
        }
    }
}
