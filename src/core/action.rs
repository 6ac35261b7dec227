//! Moves and the turn history.
//!
//! A `Move` is one card play, fully resolved: wild cards always carry the
//! color being declared. Draws are not moves; the state machine performs
//! them when the legal set is empty.
//!
//! Everything that happens to the table is appended to the history as a
//! `TurnRecord`, which makes two runs of the same seed comparable step by
//! step.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::{Card, Color};

/// A candidate play.
///
/// ```
/// use uno_engine::cards::{Card, Color, Rank};
/// use uno_engine::core::Move;
///
/// let play = Move::play(Card::new(Color::Red, Rank::Skip).unwrap());
/// assert_eq!(play.effective_color(), Color::Red);
///
/// let wild = Move::wild(Card::wild(), Color::Blue);
/// assert_eq!(wild.effective_color(), Color::Blue);
/// assert_eq!(wild.to_string(), "Wild (Blue)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The card leaving the hand.
    pub card: Card,

    /// Color declared for a wild card. `None` for colored cards.
    pub declared_color: Option<Color>,
}

impl Move {
    /// Play a colored card.
    #[must_use]
    pub const fn play(card: Card) -> Self {
        Self {
            card,
            declared_color: None,
        }
    }

    /// Play a wild card declaring `color`.
    #[must_use]
    pub const fn wild(card: Card, color: Color) -> Self {
        Self {
            card,
            declared_color: Some(color),
        }
    }

    /// The color in force after this move.
    #[must_use]
    pub fn effective_color(&self) -> Color {
        self.declared_color.unwrap_or(self.card.color())
    }

    /// Check the wild/declared-color pairing is coherent.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match self.declared_color {
            Some(color) => self.card.is_wild() && !color.is_wild(),
            None => !self.card.is_wild(),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.declared_color {
            Some(color) => write!(f, "{} ({color})", self.card),
            None => write!(f, "{}", self.card),
        }
    }
}

/// Something that happened to one player during a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// The player played a card.
    Played(Move),

    /// The player had no legal play and drew. `playable` is set when the
    /// drawn card may be played this turn.
    Drew { count: usize, playable: bool },

    /// The player drew an accumulated penalty and lost the turn.
    PenaltyDrawn { count: usize },

    /// A penalty owed for a winning draw card could not be covered by the
    /// remaining cards, so nothing was drawn.
    PenaltyVoided { count: usize },

    /// The player's turn was skipped.
    Skipped,
}

/// A history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number the event belongs to (starts at 1).
    pub turn: u32,

    /// Order within the turn.
    pub sequence: u32,

    /// The player affected.
    pub player: PlayerId,

    pub event: TurnEvent,
}

impl TurnRecord {
    #[must_use]
    pub fn new(turn: u32, sequence: u32, player: PlayerId, event: TurnEvent) -> Self {
        Self {
            turn,
            sequence,
            player,
            event,
        }
    }
}
