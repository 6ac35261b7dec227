//! Card identity: color, rank and the matching rule.
//!
//! A `Card` is a plain `Copy` value. Two cards with the same color and rank
//! are interchangeable for every rule; the deck keeps duplicates as separate
//! entries for accounting.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, UnoError};

/// Card color. `Wild` is the color printed on wild cards, never a color a
/// player may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    /// The four declarable colors, in deck-building order.
    pub const COLORED: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    /// Check if this is the wild "color".
    #[must_use]
    pub const fn is_wild(self) -> bool {
        matches!(self, Color::Wild)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Wild => "Wild",
        };
        f.write_str(name)
    }
}

/// Card rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Number card, 0 through 9.
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    /// Ranks printed on colored cards, zero first.
    pub const COLORED: [Rank; 13] = [
        Rank::Number(0),
        Rank::Number(1),
        Rank::Number(2),
        Rank::Number(3),
        Rank::Number(4),
        Rank::Number(5),
        Rank::Number(6),
        Rank::Number(7),
        Rank::Number(8),
        Rank::Number(9),
        Rank::Skip,
        Rank::Reverse,
        Rank::DrawTwo,
    ];

    /// Ranks printed on wild cards.
    pub const WILD: [Rank; 2] = [Rank::Wild, Rank::WildDrawFour];

    /// Check if this rank belongs on a wild card.
    #[must_use]
    pub const fn is_wild(self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDrawFour)
    }

    /// Penalty imposed on the next player, if any.
    #[must_use]
    pub const fn draw_amount(self) -> Option<u32> {
        match self {
            Rank::DrawTwo => Some(2),
            Rank::WildDrawFour => Some(4),
            _ => None,
        }
    }

    /// Heuristic strength used by the greedy agent.
    ///
    /// Numbers 0, reverse 1, skip 2, wild 3, draw two 4, wild draw four 5.
    #[must_use]
    pub const fn power(self) -> u8 {
        match self {
            Rank::Number(_) => 0,
            Rank::Reverse => 1,
            Rank::Skip => 2,
            Rank::Wild => 3,
            Rank::DrawTwo => 4,
            Rank::WildDrawFour => 5,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Number(n) => write!(f, "{n}"),
            Rank::Skip => f.write_str("Skip"),
            Rank::Reverse => f.write_str("Reverse"),
            Rank::DrawTwo => f.write_str("Draw Two"),
            Rank::Wild => f.write_str("Wild"),
            Rank::WildDrawFour => f.write_str("Wild Draw Four"),
        }
    }
}

/// An Uno card.
///
/// Only two shapes exist: a colored card with a colored rank, or a
/// wild-colored card with a wild rank. `Card::new` rejects anything else.
///
/// ```
/// use uno_engine::cards::{Card, Color, Rank};
///
/// let red_five = Card::new(Color::Red, Rank::Number(5)).unwrap();
/// assert_eq!(red_five.to_string(), "Red 5");
///
/// assert!(Card::new(Color::Wild, Rank::Number(5)).is_err());
/// assert!(Card::new(Color::Blue, Rank::Wild).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    color: Color,
    rank: Rank,
}

/// Unchecked wire form of a `Card`.
#[derive(Deserialize)]
struct RawCard {
    color: Color,
    rank: Rank,
}

impl TryFrom<RawCard> for Card {
    type Error = UnoError;

    fn try_from(raw: RawCard) -> Result<Self> {
        Card::new(raw.color, raw.rank)
    }
}

impl Card {
    /// Create a card, validating the color/rank pair.
    pub fn new(color: Color, rank: Rank) -> Result<Self> {
        let valid = match rank {
            Rank::Number(n) => n <= 9 && !color.is_wild(),
            Rank::Skip | Rank::Reverse | Rank::DrawTwo => !color.is_wild(),
            Rank::Wild | Rank::WildDrawFour => color.is_wild(),
        };

        if valid {
            Ok(Self { color, rank })
        } else {
            Err(UnoError::InvalidCard { color, rank })
        }
    }

    /// The plain wild card.
    #[must_use]
    pub const fn wild() -> Self {
        Self {
            color: Color::Wild,
            rank: Rank::Wild,
        }
    }

    /// The wild draw four card.
    #[must_use]
    pub const fn wild_draw_four() -> Self {
        Self {
            color: Color::Wild,
            rank: Rank::WildDrawFour,
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn rank(self) -> Rank {
        self.rank
    }

    /// Check if this is a wild card (needs a declared color when played).
    #[must_use]
    pub const fn is_wild(self) -> bool {
        self.rank.is_wild()
    }

    /// Check if this card imposes a draw penalty.
    #[must_use]
    pub const fn is_draw_card(self) -> bool {
        self.rank.draw_amount().is_some()
    }

    /// Check if this card may be played on `top` while `active_color` is in
    /// force. `active_color` is the top card's color, or the color declared
    /// for it when the top card is wild.
    ///
    /// Pending draw penalties are handled by the rules engine, not here.
    #[must_use]
    pub fn matches(self, top: Card, active_color: Color) -> bool {
        self.is_wild() || self.color == active_color || self.rank == top.rank
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_wild() {
            write!(f, "{}", self.rank)
        } else {
            write!(f, "{} {}", self.color, self.rank)
        }
    }
}
