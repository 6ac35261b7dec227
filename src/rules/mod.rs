//! Rule engine.
//!
//! - `legal_moves`: the plays open to a player in a given state
//! - `resolve_effect`: what skip, reverse and draw cards do to the table
//! - `GameOutcome`: how a finished game ended

pub mod engine;

pub use engine::{can_stack, is_legal, legal_moves, resolve_effect, GameOutcome, Resolution, TerminalReason};
