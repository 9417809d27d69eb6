// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pw: submit patch batches and track them on the review thread.

mod auth;
mod browser;
mod commands;
mod form;
mod tasks;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pw_core::Config;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pw", version, about = "Submit patch batches and track them on the review thread")]
struct Cli {
    /// Path to patchwork.toml (default: $PW_CONFIG, then ~/.config/patchwork/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick tasks in the browser and submit them as a new patch batch
    Create,
    /// Refresh the status of every recorded batch on the review thread
    Check {
        /// Explicit ticket key; defaults to the current working branch
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Create => commands::create::run(&config).await,
        Command::Check { key } => commands::check::run(&config, key.as_deref()).await,
    }
}

fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => match std::env::var_os("PW_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => dirs::config_dir()
                .map(|dir| dir.join("patchwork").join("config.toml"))
                .ok_or_else(|| anyhow::anyhow!("cannot locate a config directory; pass --config"))?,
        },
    };
    Ok(Config::load(&path)?)
}
