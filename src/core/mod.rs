//! Core engine types: players, RNG, configuration, moves, errors and the
//! game state machine.
//!
//! Everything rule-specific (what a card does, what may be played) lives in
//! `rules`; this module owns the state and the only code that mutates it.

pub mod error;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use error::{Result, UnoError};
pub use player::{Direction, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{DrawRule, ExhaustionRule, RuleConfig, StackingRule, MAX_PLAYERS, MIN_PLAYERS};
pub use action::{Move, TurnEvent, TurnRecord};
pub use state::{Deal, GameState, PendingEffect, Phase, PlayerView};
