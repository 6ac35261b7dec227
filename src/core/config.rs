//! House rules and table setup.
//!
//! Uno rule sets disagree on several points. Each disputed rule is an
//! explicit named option here with a stated default; nothing is read from
//! global state.
//!
//! | Option                       | Default            |
//! |------------------------------|--------------------|
//! | `player_count`               | 4                  |
//! | `hand_size`                  | 7                  |
//! | `composition`                | canonical 108 deck |
//! | `stacking`                   | `Disabled`         |
//! | `two_player_reverse_skips`   | `true`             |
//! | `penalty_on_final_draw_card` | `true`             |
//! | `draw_rule`                  | `PlayDrawn`        |
//! | `exhaustion`                 | `EndInDraw`        |
//! | `turn_limit`                 | 1000               |
//! | `record_hand_sizes`          | `false`            |

use serde::{Deserialize, Serialize};

use super::error::{Result, UnoError};
use crate::cards::{Card, DeckComposition};

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;
/// Largest supported table.
pub const MAX_PLAYERS: usize = 10;

/// Whether a draw penalty may be passed on by playing another draw card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackingRule {
    /// The next player draws immediately and loses the turn.
    #[default]
    Disabled,
    /// Draw two on draw two, wild draw four on wild draw four.
    SameRank,
    /// Any draw card on any draw card.
    AnyDrawCard,
}

impl StackingRule {
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, StackingRule::Disabled)
    }
}

/// What happens when a player has nothing to play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawRule {
    /// Draw one card; the turn passes.
    PassAfterDraw,
    /// Draw one card; if it can be played it must be, otherwise the turn
    /// passes.
    #[default]
    PlayDrawn,
    /// Keep drawing until a playable card arrives, then play it.
    DrawUntilPlayable,
}

/// What happens when a draw cannot be satisfied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExhaustionRule {
    /// The game ends with no winner.
    #[default]
    EndInDraw,
    /// The draw fails with `DeckExhausted`.
    Error,
}

/// Complete rule configuration for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Number of players (2-10).
    pub player_count: usize,

    /// Cards dealt to each player.
    pub hand_size: usize,

    /// Deck contents.
    pub composition: DeckComposition,

    pub stacking: StackingRule,

    /// With two players, a reverse acts as a skip.
    pub two_player_reverse_skips: bool,

    /// When a player goes out on a draw card, the next player still draws
    /// the penalty before the game is scored.
    pub penalty_on_final_draw_card: bool,

    pub draw_rule: DrawRule,

    pub exhaustion: ExhaustionRule,

    /// Turns played before the game is called a draw.
    pub turn_limit: u32,

    /// Keep a per-turn snapshot of hand sizes.
    pub record_hand_sizes: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            player_count: 4,
            hand_size: 7,
            composition: DeckComposition::default(),
            stacking: StackingRule::default(),
            two_player_reverse_skips: true,
            penalty_on_final_draw_card: true,
            draw_rule: DrawRule::default(),
            exhaustion: ExhaustionRule::default(),
            turn_limit: 1000,
            record_hand_sizes: false,
        }
    }
}

impl RuleConfig {
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON rule file; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| UnoError::InvalidConfiguration(format!("unreadable rule file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_composition(mut self, composition: DeckComposition) -> Self {
        self.composition = composition;
        self
    }

    #[must_use]
    pub fn with_stacking(mut self, stacking: StackingRule) -> Self {
        self.stacking = stacking;
        self
    }

    #[must_use]
    pub fn with_two_player_reverse_skips(mut self, enabled: bool) -> Self {
        self.two_player_reverse_skips = enabled;
        self
    }

    #[must_use]
    pub fn with_penalty_on_final_draw_card(mut self, enabled: bool) -> Self {
        self.penalty_on_final_draw_card = enabled;
        self
    }

    #[must_use]
    pub fn with_draw_rule(mut self, rule: DrawRule) -> Self {
        self.draw_rule = rule;
        self
    }

    #[must_use]
    pub fn with_exhaustion(mut self, rule: ExhaustionRule) -> Self {
        self.exhaustion = rule;
        self
    }

    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = limit;
        self
    }

    #[must_use]
    pub fn with_hand_size_recording(mut self, enabled: bool) -> Self {
        self.record_hand_sizes = enabled;
        self
    }

    /// Reject configurations that cannot produce a playable game.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(UnoError::InvalidConfiguration(format!(
                "player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
                self.player_count
            )));
        }

        if self.hand_size == 0 {
            return Err(UnoError::InvalidConfiguration(
                "hand size must be at least 1".to_string(),
            ));
        }

        if self.turn_limit == 0 {
            return Err(UnoError::InvalidConfiguration(
                "turn limit must be at least 1".to_string(),
            ));
        }

        self.composition.validate()?;

        let total = self.composition.total();
        let needed = self
            .player_count
            .checked_mul(self.hand_size)
            .and_then(|dealt| dealt.checked_add(1));
        if needed.map_or(true, |needed| total < needed) {
            return Err(UnoError::InvalidConfiguration(format!(
                "deck of {total} cards cannot deal {} x {} and flip a first card",
                self.player_count, self.hand_size
            )));
        }

        let has_draw_cards = self.composition.copies_of(Card::wild_draw_four()) > 0
            || self.composition.copies_per_rank > 0;
        if self.stacking.is_enabled() && !has_draw_cards {
            return Err(UnoError::InvalidConfiguration(
                "stacking is enabled but the deck has no draw cards".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuleConfig::default();
        assert_eq!(config.player_count, 4);
        assert_eq!(config.hand_size, 7);
        assert_eq!(config.stacking, StackingRule::Disabled);
        assert!(config.two_player_reverse_skips);
        assert!(config.penalty_on_final_draw_card);
        assert_eq!(config.draw_rule, DrawRule::PlayDrawn);
        assert_eq!(config.exhaustion, ExhaustionRule::EndInDraw);
        assert_eq!(config.turn_limit, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RuleConfig::new(2)
            .with_hand_size(5)
            .with_stacking(StackingRule::SameRank)
            .with_two_player_reverse_skips(false)
            .with_draw_rule(DrawRule::PassAfterDraw)
            .with_turn_limit(50);

        assert_eq!(config.player_count, 2);
        assert_eq!(config.hand_size, 5);
        assert!(config.stacking.is_enabled());
        assert!(!config.two_player_reverse_skips);
        assert_eq!(config.turn_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_player_count_bounds() {
        for count in [0, 1, 11] {
            let err = RuleConfig::new(count).validate().unwrap_err();
            assert!(matches!(err, UnoError::InvalidConfiguration(_)));
        }
        for count in MIN_PLAYERS..=MAX_PLAYERS {
            assert!(RuleConfig::new(count).validate().is_ok());
        }
    }

    #[test]
    fn test_deck_too_small() {
        let config = RuleConfig::new(10).with_hand_size(11);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot deal 10 x 11"));
    }

    #[test]
    fn test_zero_hand_and_turn_limit() {
        assert!(RuleConfig::default().with_hand_size(0).validate().is_err());
        assert!(RuleConfig::default().with_turn_limit(0).validate().is_err());
    }

    #[test]
    fn test_stacking_without_draw_cards() {
        let composition = DeckComposition {
            zeros_per_color: 5,
            copies_per_rank: 0,
            wild: 4,
            wild_draw_four: 0,
        };
        let config = RuleConfig::new(2)
            .with_composition(composition.clone())
            .with_stacking(StackingRule::AnyDrawCard);
        assert!(config.validate().is_err());

        let config = RuleConfig::new(2).with_composition(composition);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_partial_json() {
        let config = RuleConfig::from_json(r#"{ "player_count": 6, "stacking": "SameRank" }"#).unwrap();
        assert_eq!(config.player_count, 6);
        assert_eq!(config.stacking, StackingRule::SameRank);
        assert_eq!(config.hand_size, 7);

        assert!(RuleConfig::from_json(r#"{ "player_count": 12 }"#).is_err());
        assert!(RuleConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_huge_hand_size_is_rejected() {
        let err = RuleConfig::from_json(r#"{"hand_size": 18446744073709551615}"#).unwrap_err();
        assert!(matches!(err, UnoError::InvalidConfiguration(_)));

        let half = usize::MAX / 2 + 1;
        assert!(RuleConfig::new(2).with_hand_size(half).validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = RuleConfig::new(3).with_exhaustion(ExhaustionRule::Error);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RuleConfig::from_json(&json).unwrap(), config);
    }
}
