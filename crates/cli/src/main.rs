//! flagctl: command-line entry point for a remote feature-flag store.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments** — `--mount` (or `FLAGS_API_MOUNT`) and one subcommand.
//! 2. **Wire observability** — configure `tracing-subscriber` with a JSON layer
//!    on stderr. The level defaults to `info` and follows `RUST_LOG`.
//! 3. **Construct infrastructure** — build a [`remote_store::ClientConfig`]
//!    from the `FLAGS_API_*` environment and a [`remote_store::RemoteStore`]
//!    from it.
//! 4. **Run the command** — print its result as JSON on stdout. A declined
//!    change or any store error exits non-zero.

mod args;
mod commands;

use anyhow::{bail, Context};
use clap::Parser;
use flags::FeatureStore;
use remote_store::{ClientConfig, RemoteStore};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ClientConfig::from_env().context("reading FLAGS_API_* configuration")?;
    let store = RemoteStore::new(&cli.mount, config)
        .with_context(|| format!("creating store for {}", cli.mount))?;
    info!(store = store.name(), mount = %store.mount(), "store ready");

    let output = commands::run(&cli.command, &store)
        .await
        .with_context(|| format!("running {:?}", cli.command))?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    if output.declined() {
        bail!("the store declined {:?}", cli.command);
    }
    Ok(())
}
