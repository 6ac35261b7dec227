//! Non-interactive agents.

use std::collections::VecDeque;

use log::trace;

use super::Agent;
use crate::cards::{Card, Color};
use crate::core::{GameRng, Move, PlayerView};

// =============================================================================
// Random
// =============================================================================

/// Picks uniformly among the legal moves.
///
/// Owns its RNG so that a game played by random agents is reproducible from
/// the agents' seeds and the game seed.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    name: String,
    rng: GameRng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            name: "random".to_string(),
            rng: GameRng::new(seed),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, _view: &PlayerView<'_>, legal: &[Move]) -> Move {
        legal[self.rng.gen_index(legal.len())]
    }
}

// =============================================================================
// Greedy
// =============================================================================

/// Plays the highest-power card it can.
///
/// Power ranks numbers lowest, then reverse, skip, wild, draw two and wild
/// draw four. Ties go to the card seen first in hand. A wild is declared as
/// the most common color among the colored cards in hand, Red when there
/// are none.
#[derive(Clone, Debug)]
pub struct GreedyAgent {
    name: String,
}

impl GreedyAgent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "greedy".to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Color to declare when playing a wild from `hand`.
    #[must_use]
    pub fn preferred_color(hand: &[Card]) -> Color {
        let mut counts: Vec<(Color, usize)> = Vec::with_capacity(Color::COLORED.len());
        for card in hand.iter().filter(|card| !card.is_wild()) {
            match counts.iter_mut().find(|(color, _)| *color == card.color()) {
                Some((_, count)) => *count += 1,
                None => counts.push((card.color(), 1)),
            }
        }

        counts
            .iter()
            .fold(None, |best: Option<(Color, usize)>, &(color, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((color, count)),
            })
            .map_or(Color::Red, |(color, _)| color)
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, view: &PlayerView<'_>, legal: &[Move]) -> Move {
        let mut best = legal[0];
        for mv in &legal[1..] {
            if mv.card.rank().power() > best.card.rank().power() {
                best = *mv;
            }
        }

        if best.card.is_wild() {
            let color = Self::preferred_color(view.hand);
            trace!("{} declares {color}", self.name);
            return Move::wild(best.card, color);
        }

        best
    }
}

// =============================================================================
// Scripted
// =============================================================================

/// Replays a fixed sequence of moves.
///
/// Scripted moves are returned as-is, even when not legal, so scripts can
/// exercise the engine's validation. Once the script runs out the first
/// legal move is played.
#[derive(Clone, Debug)]
pub struct ScriptedAgent {
    name: String,
    script: VecDeque<Move>,
}

impl ScriptedAgent {
    pub fn new(script: impl IntoIterator<Item = Move>) -> Self {
        Self {
            name: "scripted".to_string(),
            script: script.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Moves not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, _view: &PlayerView<'_>, legal: &[Move]) -> Move {
        self.script.pop_front().unwrap_or(legal[0])
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Adapts a closure into an agent.
///
/// ```
/// use uno_engine::agents::{Agent, PolicyAgent};
/// use uno_engine::core::Move;
///
/// let last = PolicyAgent::new("last", |_view, legal: &[Move]| *legal.last().unwrap());
/// assert_eq!(last.name(), "last");
/// ```
pub struct PolicyAgent<F> {
    name: String,
    policy: F,
}

impl<F> PolicyAgent<F>
where
    F: FnMut(&PlayerView<'_>, &[Move]) -> Move,
{
    pub fn new(name: impl Into<String>, policy: F) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

impl<F> Agent for PolicyAgent<F>
where
    F: FnMut(&PlayerView<'_>, &[Move]) -> Move,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, view: &PlayerView<'_>, legal: &[Move]) -> Move {
        (self.policy)(view, legal)
    }
}
