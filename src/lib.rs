//! # uno-engine
//!
//! A deterministic Uno engine built for batch self-play.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: every shuffle and every random agent draws from a
//!    seeded `GameRng`. Same rules + same seed = same game.
//!
//! 2. **N-Player First**: tables seat 2-10 players; every API takes the
//!    player count from the `RuleConfig`.
//!
//! 3. **Explicit House Rules**: stacking, draw behavior, exhaustion and the
//!    two-player reverse are `RuleConfig` options with stated defaults.
//!
//! ## Architecture
//!
//! - **Single Owner**: `GameState` owns deck, discard pile and hands. The
//!   rule engine only reads it; agents only see a `PlayerView`.
//!
//! - **Persistent History**: the turn log is an `im::Vector`, so cloning a
//!   state mid-game stays cheap.
//!
//! ## Modules
//!
//! - `cards`: cards, deck composition, draw and discard piles
//! - `core`: players, RNG, configuration, moves, errors, game state machine
//! - `rules`: legal moves and special-card effects
//! - `agents`: the `Agent` trait and built-in decision makers
//! - `sim`: running single games and parallel batches
//!
//! ## Example
//!
//! ```
//! use uno_engine::{run_game, Agent, GreedyAgent, RandomAgent, RuleConfig};
//!
//! let config = RuleConfig::new(2);
//! let mut agents: Vec<Box<dyn Agent>> = vec![
//!     Box::new(GreedyAgent::new()),
//!     Box::new(RandomAgent::new(7)),
//! ];
//!
//! let record = run_game(&config, 42, &mut agents).unwrap();
//! assert!(record.turns <= config.turn_limit);
//! ```

pub mod cards;
pub mod core;
pub mod rules;
pub mod agents;
pub mod sim;

// Re-export commonly used types
pub use crate::cards::{Card, Color, Deck, DeckComposition, DiscardPile, Rank};

pub use crate::core::{
    Deal, Direction, DrawRule, ExhaustionRule, GameRng, GameRngState, GameState, Move, PendingEffect, Phase,
    PlayerId, PlayerMap, PlayerView, RuleConfig, StackingRule, TurnEvent, TurnRecord, UnoError,
};

pub use crate::rules::{legal_moves, GameOutcome, TerminalReason};

pub use crate::agents::{Agent, GreedyAgent, InteractiveAgent, PolicyAgent, RandomAgent, ScriptedAgent};

pub use crate::sim::{
    run_game, AgentFactory, ErrorPolicy, GameRecord, RecordCollector, Reporter, Simulation, SimulationConfig,
    SimulationSummary,
};
