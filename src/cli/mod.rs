//! CLI command implementations for uno-sim.

pub(crate) mod logger;
pub(crate) mod play;
pub(crate) mod simulate;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use uno_engine::{Agent, GreedyAgent, PlayerId, RandomAgent, RuleConfig, UnoError};

/// Bot kinds selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum AgentKind {
    /// Highest-power card first.
    Greedy,
    /// Uniformly random legal move.
    Random,
}

impl AgentKind {
    /// Build the bot for `player` in the game seeded with `seed`.
    pub(crate) fn build(self, player: PlayerId, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Greedy => Box::new(GreedyAgent::new().with_name(format!("greedy-{}", player.0))),
            AgentKind::Random => Box::new(
                RandomAgent::new(seed.wrapping_mul(31).wrapping_add(u64::from(player.0)))
                    .with_name(format!("random-{}", player.0)),
            ),
        }
    }
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SummaryFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<UnoError> for CliError {
    fn from(e: UnoError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load rules from `path`, or the defaults, then seat `players`.
pub(crate) fn load_rules(path: Option<&Path>, players: usize) -> Result<RuleConfig, CliError> {
    let rules = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
            RuleConfig::from_json(&json)?
        }
        None => RuleConfig::default(),
    };

    let rules = rules.with_player_count(players);
    rules.validate()?;
    Ok(rules)
}

/// The given seed, or one taken from the clock.
pub(crate) fn seed_or_now(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
