//! Decision-makers that choose a move for the active player.
//!
//! The engine calls [`Agent::choose_move`] only when at least one legal move
//! exists, and validates the answer: a move outside the offered set fails
//! the step with `InvalidAgentResponse`. Agents only see a [`PlayerView`],
//! never the full state.
//!
//! ## Built-in agents
//!
//! - `RandomAgent`: uniform over the legal moves, seeded
//! - `GreedyAgent`: highest-power card, wilds declared as the most common
//!   color in hand
//! - `ScriptedAgent`: replays a fixed list of moves (tests and replays)
//! - `PolicyAgent`: wraps a closure
//! - `InteractiveAgent`: prompts a human over any reader/writer pair

pub mod basic;
pub mod interactive;

pub use basic::{GreedyAgent, PolicyAgent, RandomAgent, ScriptedAgent};
pub use interactive::InteractiveAgent;

use crate::core::{Move, PlayerView};

/// Chooses one move from a non-empty legal set.
pub trait Agent {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Pick one of `legal`, which is never empty.
    fn choose_move(&mut self, view: &PlayerView<'_>, legal: &[Move]) -> Move;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_move(&mut self, view: &PlayerView<'_>, legal: &[Move]) -> Move {
        (**self).choose_move(view, legal)
    }
}
