//! Legality and special-card resolution.
//!
//! Both entry points are pure: they read a `GameState` (or the pieces of it
//! they need) and return a value. Only the state machine mutates state.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Color, Rank};
use crate::core::action::Move;
use crate::core::config::{RuleConfig, StackingRule};
use crate::core::player::{Direction, PlayerId};
use crate::core::state::{GameState, PendingEffect, Phase};

/// Why a game stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalReason {
    /// A player emptied their hand.
    HandEmptied,
    /// A draw could not be satisfied under `ExhaustionRule::EndInDraw`.
    DeckExhausted,
    /// The configured turn limit was reached.
    TurnLimit,
}

impl std::fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TerminalReason::HandEmptied => "hand emptied",
            TerminalReason::DeckExhausted => "deck exhausted",
            TerminalReason::TurnLimit => "turn limit",
        };
        f.write_str(name)
    }
}

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// `None` when the game ended without a winner.
    pub winner: Option<PlayerId>,
    pub reason: TerminalReason,
}

impl GameOutcome {
    #[must_use]
    pub fn winner(player: PlayerId) -> Self {
        Self {
            winner: Some(player),
            reason: TerminalReason::HandEmptied,
        }
    }

    #[must_use]
    pub fn no_winner(reason: TerminalReason) -> Self {
        Self { winner: None, reason }
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == Some(player)
    }
}

/// Enumerate the plays open to `player`.
///
/// Empty when the player is not active, the game is over, or nothing in hand
/// can be played; in the last case the state machine forces a draw instead.
/// Wild cards expand to one move per declarable color, and identical cards
/// in hand yield a single move.
pub fn legal_moves(state: &GameState, player: PlayerId) -> Vec<Move> {
    if state.is_terminal() || player != state.active_player() {
        return Vec::new();
    }

    let candidates: &[Card] = match state.phase() {
        Phase::Drawing { drawn } => std::slice::from_ref(drawn),
        _ => state.hand(player),
    };

    let top = state.top_card();
    let active_color = state.active_color();
    let stacking = state.config().stacking;
    let pending = state.pending();

    let mut seen = FxHashSet::default();
    let mut moves = Vec::new();

    for &card in candidates {
        let playable = match pending {
            PendingEffect::Draw { .. } => can_stack(card, top, stacking),
            PendingEffect::None => card.matches(top, active_color),
        };

        if playable && seen.insert(card) {
            push_moves(card, &mut moves);
        }
    }

    moves
}

/// Check whether `mv` is in the legal set for `player`.
#[must_use]
pub fn is_legal(state: &GameState, player: PlayerId, mv: &Move) -> bool {
    mv.is_well_formed() && legal_moves(state, player).contains(mv)
}

/// Check whether `card` may answer a pending draw penalty.
#[must_use]
pub fn can_stack(card: Card, top: Card, rule: StackingRule) -> bool {
    match rule {
        StackingRule::Disabled => false,
        StackingRule::SameRank => card.is_draw_card() && card.rank() == top.rank(),
        StackingRule::AnyDrawCard => card.is_draw_card(),
    }
}

fn push_moves(card: Card, out: &mut Vec<Move>) {
    if card.is_wild() {
        out.extend(Color::COLORED.iter().map(|&color| Move::wild(card, color)));
    } else {
        out.push(Move::play(card));
    }
}

/// What a played card does to the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Direction of play after the card.
    pub direction: Direction,
    /// The next player loses their turn.
    pub skip_next: bool,
    /// Penalty the next player draws right away (stacking disabled).
    pub immediate_penalty: Option<u32>,
    /// Penalty carried to the next player (stacking enabled).
    pub pending: PendingEffect,
}

/// Resolve the effect of `card` just played.
///
/// `pending` is the penalty in force before the play; under stacking a draw
/// card adds to it.
#[must_use]
pub fn resolve_effect(
    card: Card,
    config: &RuleConfig,
    direction: Direction,
    pending: PendingEffect,
) -> Resolution {
    let mut resolution = Resolution {
        direction,
        skip_next: false,
        immediate_penalty: None,
        pending: PendingEffect::None,
    };

    match card.rank() {
        Rank::Skip => resolution.skip_next = true,
        Rank::Reverse => {
            resolution.direction = direction.reversed();
            if config.player_count == 2 && config.two_player_reverse_skips {
                resolution.skip_next = true;
            }
        }
        Rank::DrawTwo | Rank::WildDrawFour => {
            let amount = card.rank().draw_amount().unwrap_or(0);
            if config.stacking.is_enabled() {
                resolution.pending = PendingEffect::Draw {
                    amount: pending.draw_amount() + amount,
                };
            } else {
                resolution.immediate_penalty = Some(amount);
                resolution.skip_next = true;
            }
        }
        Rank::Number(_) | Rank::Wild => {}
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(color: Color, rank: Rank) -> Card {
        Card::new(color, rank).unwrap()
    }

    #[test]
    fn test_outcome_helpers() {
        let win = GameOutcome::winner(PlayerId::new(2));
        assert!(win.is_winner(PlayerId::new(2)));
        assert!(!win.is_winner(PlayerId::new(0)));
        assert_eq!(win.reason, TerminalReason::HandEmptied);

        let draw = GameOutcome::no_winner(TerminalReason::TurnLimit);
        assert!(!draw.is_winner(PlayerId::new(0)));
        assert_eq!(draw.reason.to_string(), "turn limit");
    }

    #[test]
    fn test_can_stack() {
        let draw_two = card(Color::Red, Rank::DrawTwo);
        let other_draw_two = card(Color::Blue, Rank::DrawTwo);
        let draw_four = Card::wild_draw_four();

        assert!(!can_stack(other_draw_two, draw_two, StackingRule::Disabled));

        assert!(can_stack(other_draw_two, draw_two, StackingRule::SameRank));
        assert!(!can_stack(draw_four, draw_two, StackingRule::SameRank));
        assert!(can_stack(draw_four, draw_four, StackingRule::SameRank));

        assert!(can_stack(draw_four, draw_two, StackingRule::AnyDrawCard));
        assert!(!can_stack(card(Color::Red, Rank::Skip), draw_two, StackingRule::AnyDrawCard));
    }

    #[test]
    fn test_resolve_skip_and_number() {
        let config = RuleConfig::default();

        let r = resolve_effect(card(Color::Red, Rank::Skip), &config, Direction::Clockwise, PendingEffect::None);
        assert!(r.skip_next);
        assert_eq!(r.direction, Direction::Clockwise);

        let r = resolve_effect(card(Color::Red, Rank::Number(3)), &config, Direction::Clockwise, PendingEffect::None);
        assert!(!r.skip_next);
        assert_eq!(r.immediate_penalty, None);
        assert_eq!(r.pending, PendingEffect::None);
    }

    #[test]
    fn test_resolve_reverse() {
        let reverse = card(Color::Green, Rank::Reverse);

        let r = resolve_effect(reverse, &RuleConfig::new(4), Direction::Clockwise, PendingEffect::None);
        assert_eq!(r.direction, Direction::CounterClockwise);
        assert!(!r.skip_next);

        let r = resolve_effect(reverse, &RuleConfig::new(2), Direction::Clockwise, PendingEffect::None);
        assert!(r.skip_next);

        let plain = RuleConfig::new(2).with_two_player_reverse_skips(false);
        let r = resolve_effect(reverse, &plain, Direction::CounterClockwise, PendingEffect::None);
        assert_eq!(r.direction, Direction::Clockwise);
        assert!(!r.skip_next);
    }

    #[test]
    fn test_resolve_draw_without_stacking() {
        let r = resolve_effect(Card::wild_draw_four(), &RuleConfig::default(), Direction::Clockwise, PendingEffect::None);
        assert_eq!(r.immediate_penalty, Some(4));
        assert!(r.skip_next);
        assert_eq!(r.pending, PendingEffect::None);
    }

    #[test]
    fn test_resolve_draw_with_stacking_accumulates() {
        let config = RuleConfig::default().with_stacking(StackingRule::AnyDrawCard);

        let r = resolve_effect(card(Color::Red, Rank::DrawTwo), &config, Direction::Clockwise, PendingEffect::None);
        assert_eq!(r.pending, PendingEffect::Draw { amount: 2 });
        assert_eq!(r.immediate_penalty, None);
        assert!(!r.skip_next);

        let r = resolve_effect(Card::wild_draw_four(), &config, Direction::Clockwise, r.pending);
        assert_eq!(r.pending, PendingEffect::Draw { amount: 6 });
    }
}
