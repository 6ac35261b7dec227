//! Card & deck model.
//!
//! ## Key Types
//!
//! - `Card`, `Color`, `Rank`: immutable card identity and the matching rule
//! - `DeckComposition`: how many of each card a deck holds
//! - `Deck`: the draw pile (shuffle, draw with discard recycling)
//! - `DiscardPile`: played cards, top = most recent

pub mod card;
pub mod deck;

pub use card::{Card, Color, Rank};
pub use deck::{build_deck, count_cards, Deck, DeckComposition, DiscardPile, DrawnCards};
