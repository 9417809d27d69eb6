// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task discovery from the project's build-config YAML.
//!
//! The build config lists every task definition; the form only offers the
//! ones tagged with the configured build variant.

use anyhow::{Context, Result};
use pw_core::Config;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BuildConfig {
    #[serde(default)]
    tasks: Vec<TaskDef>,
}

#[derive(Debug, Deserialize)]
struct TaskDef {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Read the working copy's build config and return the offerable tasks.
pub fn load_variant_tasks(config: &Config) -> Result<Vec<String>> {
    let path = config.local_repo.join(&config.build_config);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read build config {}", path.display()))?;
    variant_tasks(&content, &config.build_variant)
        .with_context(|| format!("cannot parse build config {}", path.display()))
}

/// Task names tagged with `variant`, in file order.
fn variant_tasks(content: &str, variant: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let doc: BuildConfig = serde_yaml::from_str(content)?;
    Ok(doc
        .tasks
        .into_iter()
        .filter(|task| task.tags.iter().any(|tag| tag == variant))
        .map(|task| task.name)
        .collect())
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
