//! Client configuration
//!
//! Built from `VVW_*` environment variables; the binary then lays CLI flags over the top.
//! Unset or unparsable variables fall back to the defaults.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::engine::{PassStrategy, RandomStrategy, Strategy};
use crate::types::{DEFAULT_CLIENT_NAME, DEFAULT_TURN_BUDGET_MS};

/// Bundled move-selection policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Random,
    Pass,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Pass => "pass",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "pass" => Ok(StrategyKind::Pass),
            other => Err(format!("unknown strategy {other:?} (expected random or pass)")),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub turn_budget: Duration,
    pub strategy: StrategyKind,
    /// `None` seeds from the clock
    pub seed: Option<u32>,
    /// `None` plays until the server says goodbye
    pub max_games: Option<u32>,
    pub wire_log: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            name: DEFAULT_CLIENT_NAME.to_string(),
            turn_budget: Duration::from_millis(DEFAULT_TURN_BUDGET_MS),
            strategy: StrategyKind::default(),
            seed: None,
            max_games: None,
            wire_log: None,
        }
    }

    /// Defaults overridden by the process environment
    pub fn from_env(host: impl Into<String>, port: u16) -> Self {
        Self::from_lookup(host, port, |key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(host: impl Into<String>, port: u16, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(host, port);
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(name) = var("VVW_NAME") {
            config.name = name;
        }
        if let Some(ms) = var("VVW_TURN_BUDGET_MS").and_then(|s| s.parse::<u64>().ok()) {
            config.turn_budget = Duration::from_millis(ms);
        }
        if let Some(kind) = var("VVW_STRATEGY").and_then(|s| s.parse().ok()) {
            config.strategy = kind;
        }
        config.seed = var("VVW_SEED").and_then(|s| s.parse().ok());
        config.max_games = var("VVW_MAX_GAMES")
            .and_then(|s| s.parse().ok())
            .filter(|&n: &u32| n > 0);
        config.wire_log = var("VVW_WIRE_LOG").map(PathBuf::from);
        config
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn build_strategy(&self) -> Box<dyn Strategy + Send> {
        match self.strategy {
            StrategyKind::Random => match self.seed {
                Some(seed) => Box::new(RandomStrategy::new(seed)),
                None => Box::new(RandomStrategy::from_clock()),
            },
            StrategyKind::Pass => Box::new(PassStrategy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup("localhost", 5555, lookup(&[]));
        assert_eq!(config, ClientConfig::new("localhost", 5555));
        assert_eq!(config.name, "vvw-client");
        assert_eq!(config.turn_budget, Duration::from_millis(1800));
        assert_eq!(config.strategy, StrategyKind::Random);
        assert_eq!(config.addr(), "localhost:5555");
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(
            "10.0.0.2",
            7000,
            lookup(&[
                ("VVW_NAME", " nightfall "),
                ("VVW_TURN_BUDGET_MS", "900"),
                ("VVW_STRATEGY", "PASS"),
                ("VVW_SEED", "17"),
                ("VVW_MAX_GAMES", "3"),
                ("VVW_WIRE_LOG", "/tmp/wire.jsonl"),
            ]),
        );
        assert_eq!(config.name, "nightfall");
        assert_eq!(config.turn_budget, Duration::from_millis(900));
        assert_eq!(config.strategy, StrategyKind::Pass);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.max_games, Some(3));
        assert_eq!(config.wire_log, Some(PathBuf::from("/tmp/wire.jsonl")));
        assert_eq!(config.build_strategy().name(), "pass");
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ClientConfig::from_lookup(
            "h",
            1,
            lookup(&[
                ("VVW_TURN_BUDGET_MS", "soon"),
                ("VVW_STRATEGY", "minimax"),
                ("VVW_NAME", "   "),
                ("VVW_MAX_GAMES", "0"),
            ]),
        );
        assert_eq!(config, ClientConfig::new("h", 1));
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("Random".parse::<StrategyKind>(), Ok(StrategyKind::Random));
        assert!("greedy".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::Pass.to_string(), "pass");
    }
}
