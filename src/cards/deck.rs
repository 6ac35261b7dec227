//! Deck composition, the draw pile and the discard pile.
//!
//! ## Ownership
//!
//! The draw pile and discard pile are owned by `GameState`; cards move by
//! value between them and the hands. Nothing outside the state machine holds
//! a copy of either pile, so there is no stale deck to get out of sync.
//!
//! ## Orientation
//!
//! Both piles store their top card at the end of the `Vec`.

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, Color, Rank};
use crate::core::error::{Result, UnoError};
use crate::core::rng::GameRng;

/// How many copies of each card a deck holds.
///
/// The default is the canonical 108-card deck: one zero and two of every
/// other colored rank per color, four wilds and four wild draw fours.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckComposition {
    /// Zeros per color.
    pub zeros_per_color: u8,
    /// Copies per color of each rank 1-9, skip, reverse and draw two.
    pub copies_per_rank: u8,
    /// Plain wild cards.
    pub wild: u8,
    /// Wild draw four cards.
    pub wild_draw_four: u8,
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self {
            zeros_per_color: 1,
            copies_per_rank: 2,
            wild: 4,
            wild_draw_four: 4,
        }
    }
}

impl DeckComposition {
    /// Number of copies of `card` in a deck of this composition.
    #[must_use]
    pub fn copies_of(&self, card: Card) -> usize {
        let copies = match card.rank() {
            Rank::Number(0) => self.zeros_per_color,
            Rank::Wild => self.wild,
            Rank::WildDrawFour => self.wild_draw_four,
            _ => self.copies_per_rank,
        };
        usize::from(copies)
    }

    /// Number of colored (non-wild) cards.
    #[must_use]
    pub fn colored_total(&self) -> usize {
        let per_color = usize::from(self.zeros_per_color) + 12 * usize::from(self.copies_per_rank);
        per_color * Color::COLORED.len()
    }

    /// Total number of cards.
    #[must_use]
    pub fn total(&self) -> usize {
        self.colored_total() + usize::from(self.wild) + usize::from(self.wild_draw_four)
    }

    /// Check the composition can start a game at all.
    ///
    /// The first discard must be a colored card, so a deck with no colored
    /// cards is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.colored_total() == 0 {
            return Err(UnoError::InvalidConfiguration(
                "deck composition has no colored cards to start the discard pile".to_string(),
            ));
        }
        Ok(())
    }

    /// Every card of the composition in canonical (unshuffled) order.
    pub fn cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.total());

        for color in Color::COLORED {
            for rank in Rank::COLORED {
                if let Ok(card) = Card::new(color, rank) {
                    cards.extend(std::iter::repeat(card).take(self.copies_of(card)));
                }
            }
        }

        for card in [Card::wild(), Card::wild_draw_four()] {
            cards.extend(std::iter::repeat(card).take(self.copies_of(card)));
        }

        cards
    }

    /// The composition as a multiset, for conservation checks.
    #[must_use]
    pub fn card_counts(&self) -> FxHashMap<Card, usize> {
        count_cards(self.cards())
    }
}

/// Count cards into a multiset.
pub fn count_cards(cards: impl IntoIterator<Item = Card>) -> FxHashMap<Card, usize> {
    let mut counts = FxHashMap::default();
    for card in cards {
        *counts.entry(card).or_insert(0) += 1;
    }
    counts
}

/// Cards drawn in one go. Penalties rarely exceed four cards.
pub type DrawnCards = SmallVec<[Card; 4]>;

/// Build an unshuffled draw pile for `composition`.
pub fn build_deck(composition: &DeckComposition) -> Result<Deck> {
    composition.validate()?;
    Ok(Deck::from_cards(composition.cards()))
}

/// The draw pile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Create a pile from cards given bottom first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom first.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Reorder the pile deterministically from `rng`.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Remove the top card.
    pub fn pop_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Put a card back at a random depth.
    pub fn insert_random(&mut self, card: Card, rng: &mut GameRng) {
        let at = rng.gen_index(self.cards.len() + 1);
        self.cards.insert(at, card);
    }

    /// Draw `n` cards, top first.
    ///
    /// When the pile is short, everything in `discard` except its top card is
    /// shuffled and slid under the remaining cards. If that still cannot
    /// cover `n`, fails with `DeckExhausted` and moves nothing.
    pub fn draw(&mut self, n: usize, discard: &mut DiscardPile, rng: &mut GameRng) -> Result<DrawnCards> {
        let available = self.cards.len() + discard.len() - 1;
        if n > available {
            return Err(UnoError::DeckExhausted { requested: n, available });
        }

        if self.cards.len() < n {
            self.refill_from(discard, rng);
        }

        let split = self.cards.len() - n;
        Ok(self.cards.drain(split..).rev().collect())
    }

    /// Move all but the top discard under this pile, shuffled.
    ///
    /// Returns the number of cards recycled.
    pub fn refill_from(&mut self, discard: &mut DiscardPile, rng: &mut GameRng) -> usize {
        let mut recycled = discard.take_all_but_top();
        let count = recycled.len();
        rng.shuffle(&mut recycled);
        recycled.append(&mut self.cards);
        self.cards = recycled;

        debug!("Reshuffled {count} discarded card(s) into the draw pile ({} total)", self.cards.len());
        count
    }
}

/// The discard pile. Never empty once a game has started.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDiscardPile")]
pub struct DiscardPile {
    cards: Vec<Card>,
}

#[derive(Deserialize)]
struct RawDiscardPile {
    cards: Vec<Card>,
}

impl TryFrom<RawDiscardPile> for DiscardPile {
    type Error = UnoError;

    fn try_from(raw: RawDiscardPile) -> Result<Self> {
        if raw.cards.is_empty() {
            return Err(UnoError::InvalidConfiguration(
                "discard pile must hold at least its top card".to_string(),
            ));
        }
        Ok(Self { cards: raw.cards })
    }
}

impl DiscardPile {
    /// Start a pile with its first face-up card.
    #[must_use]
    pub fn new(first: Card) -> Self {
        Self { cards: vec![first] }
    }

    /// The most recently played card.
    #[must_use]
    pub fn top(&self) -> Card {
        // Construction and deserialization both require a card, and
        // `take_all_but_top` keeps the top.
        self.cards[self.cards.len() - 1]
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; present for API symmetry with `Deck`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom first.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Remove and return everything under the top card, bottom first.
    pub fn take_all_but_top(&mut self) -> Vec<Card> {
        let keep_from = self.cards.len() - 1;
        let mut rest = self.cards.split_off(keep_from);
        std::mem::swap(&mut rest, &mut self.cards);
        rest
    }
}
