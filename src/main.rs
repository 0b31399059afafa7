//! Vampires vs Werewolves client (default binary).
//!
//! Connects, plays until the server says goodbye (or the game limit is hit) and exits zero.
//! Any connection or protocol failure exits non-zero.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vvw=info")),
        )
        .init();

    let config = Cli::parse().into_config();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    match runtime.block_on(vvw_client::adapter::run(&config)) {
        Ok(outcome) => {
            info!(
                games = outcome.games_completed,
                turns = outcome.turns_played,
                "done"
            );
            Ok(())
        }
        Err(err) => {
            error!(%err, "session failed");
            Err(err).with_context(|| format!("session with {} failed", config.addr()))
        }
    }
}
