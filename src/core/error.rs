//! Engine error type.
//!
//! Nothing here is retried by the engine. Exhaustion and contract
//! violations propagate to the caller, which decides whether to abandon a
//! single game or the whole simulation run.

use std::fmt;

use super::action::Move;
use super::player::PlayerId;
use crate::cards::{Color, Rank};

/// Errors raised by the deck, rules, state machine and simulation driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnoError {
    /// A draw was requested but the draw pile, even after reshuffling the
    /// discard pile, holds fewer cards than needed.
    DeckExhausted {
        /// Cards requested.
        requested: usize,
        /// Cards that could have been supplied.
        available: usize,
    },
    /// The move is not in the current legal set for the player.
    IllegalMove {
        /// Player the move was applied for.
        player: PlayerId,
        /// The offending move.
        mv: Move,
    },
    /// An agent returned a move outside the set it was offered.
    InvalidAgentResponse {
        /// Player the agent acts for.
        player: PlayerId,
        /// Agent name.
        agent: String,
        /// The returned move.
        mv: Move,
    },
    /// Contradictory or unusable configuration, detected at setup.
    InvalidConfiguration(String),
    /// The color/rank pair does not describe a real card.
    InvalidCard {
        /// Requested color.
        color: Color,
        /// Requested rank.
        rank: Rank,
    },
    /// The game has reached a terminal state and accepts no more moves.
    GameOver,
    /// The player asked to draw while holding a legal play, or while
    /// already committed to playing a drawn card.
    DrawNotAllowed {
        /// Player who asked to draw.
        player: PlayerId,
    },
    /// A turn action was issued on behalf of a player who is not active.
    NotYourTurn {
        /// Player the action was issued for.
        player: PlayerId,
        /// Player whose turn it is.
        active: PlayerId,
    },
}

impl fmt::Display for UnoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeckExhausted { requested, available } => write!(
                f,
                "Deck exhausted: requested {requested} card(s), only {available} available"
            ),
            Self::IllegalMove { player, mv } => write!(f, "{player} cannot play {mv}"),
            Self::InvalidAgentResponse { player, agent, mv } => write!(
                f,
                "Agent '{agent}' for {player} returned {mv}, which was not offered"
            ),
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::InvalidCard { color, rank } => write!(f, "{color:?} {rank:?} is not a valid card"),
            Self::GameOver => write!(f, "The game is already over"),
            Self::DrawNotAllowed { player } => write!(f, "{player} may not draw now"),
            Self::NotYourTurn { player, active } => {
                write!(f, "It is not {player}'s turn ({active} is active)")
            }
        }
    }
}

impl std::error::Error for UnoError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UnoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    #[test]
    fn test_display_messages() {
        let err = UnoError::DeckExhausted { requested: 4, available: 1 };
        assert_eq!(err.to_string(), "Deck exhausted: requested 4 card(s), only 1 available");

        let err = UnoError::NotYourTurn {
            player: PlayerId::new(2),
            active: PlayerId::new(0),
        };
        assert_eq!(err.to_string(), "It is not Player 2's turn (Player 0 is active)");

        let err = UnoError::InvalidCard {
            color: Color::Wild,
            rank: Rank::Number(5),
        };
        assert!(err.to_string().contains("not a valid card"));

        let err = UnoError::DrawNotAllowed { player: PlayerId::new(3) };
        assert_eq!(err.to_string(), "Player 3 may not draw now");
    }

    #[test]
    fn test_illegal_move_mentions_card() {
        let card = Card::new(Color::Red, Rank::Skip).unwrap();
        let err = UnoError::IllegalMove {
            player: PlayerId::new(1),
            mv: Move::play(card),
        };
        assert_eq!(err.to_string(), "Player 1 cannot play Red Skip");
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&UnoError::GameOver);
    }
}
