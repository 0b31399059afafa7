//! Command-line interface for vvw-client.

use std::path::PathBuf;

use clap::Parser;

use vvw_client::adapter::{ClientConfig, StrategyKind};

/// Vampires vs Werewolves client - connects to a game server and plays until it says goodbye
#[derive(Parser, Debug)]
#[command(name = "vvw-client")]
#[command(about = "Protocol client for the Vampires vs Werewolves game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Server address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Name sent to the server [env: VVW_NAME]
    #[arg(long)]
    pub name: Option<String>,

    /// Soft per-turn deadline in milliseconds [env: VVW_TURN_BUDGET_MS]
    #[arg(long)]
    pub turn_budget_ms: Option<u64>,

    /// Move policy: random or pass [env: VVW_STRATEGY]
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    /// Seed for the random strategy [env: VVW_SEED]
    #[arg(long)]
    pub seed: Option<u32>,

    /// Leave after this many games, at least 1 [env: VVW_MAX_GAMES]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_games: Option<u32>,

    /// Append a JSON-lines record of every message to this file [env: VVW_WIRE_LOG]
    #[arg(long)]
    pub wire_log: Option<PathBuf>,
}

impl Cli {
    /// Environment first, flags on top
    pub fn into_config(self) -> ClientConfig {
        let mut config = ClientConfig::from_env(self.host, self.port);
        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(ms) = self.turn_budget_ms {
            config.turn_budget = std::time::Duration::from_millis(ms);
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.max_games.is_some() {
            config.max_games = self.max_games;
        }
        if self.wire_log.is_some() {
            config.wire_log = self.wire_log;
        }
        config
    }
}
