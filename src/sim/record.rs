//! Per-game records and aggregate statistics.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};
use crate::rules::{GameOutcome, TerminalReason};

/// Outcome of one finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Position of the game within its run.
    pub game_index: u64,

    pub seed: u64,

    /// `None` for games ending without a winner.
    pub winner: Option<PlayerId>,

    /// Turns played, including the final one.
    pub turns: u32,

    pub reason: TerminalReason,

    /// Hand sizes after the deal and after each turn. Empty unless the rules
    /// enable `record_hand_sizes`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hand_size_trace: Vec<PlayerMap<usize>>,
}

impl GameRecord {
    #[must_use]
    pub fn new(game_index: u64, seed: u64, outcome: GameOutcome, turns: u32) -> Self {
        Self {
            game_index,
            seed,
            winner: outcome.winner,
            turns,
            reason: outcome.reason,
            hand_size_trace: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hand_size_trace(mut self, trace: Vec<PlayerMap<usize>>) -> Self {
        self.hand_size_trace = trace;
        self
    }
}

/// Aggregate statistics over a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Games that reached a terminal state.
    pub games_played: u64,

    /// Games abandoned on error under `ErrorPolicy::SkipGame`.
    pub games_failed: u64,

    /// Wins per seat.
    pub wins: Vec<u64>,

    /// Games that ended without a winner.
    pub draws: u64,

    pub total_turns: u64,
    pub min_turns: Option<u32>,
    pub max_turns: Option<u32>,
}

impl SimulationSummary {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            games_played: 0,
            games_failed: 0,
            wins: vec![0; player_count],
            draws: 0,
            total_turns: 0,
            min_turns: None,
            max_turns: None,
        }
    }

    pub fn add_record(&mut self, record: &GameRecord) {
        self.games_played += 1;
        self.total_turns += u64::from(record.turns);
        self.min_turns = Some(self.min_turns.map_or(record.turns, |m| m.min(record.turns)));
        self.max_turns = Some(self.max_turns.map_or(record.turns, |m| m.max(record.turns)));

        match record.winner {
            Some(winner) => {
                if let Some(count) = self.wins.get_mut(winner.index()) {
                    *count += 1;
                }
            }
            None => self.draws += 1,
        }
    }

    pub fn add_failure(&mut self) {
        self.games_failed += 1;
    }

    /// Fold another partial summary into this one.
    pub fn merge(&mut self, other: &SimulationSummary) {
        self.games_played += other.games_played;
        self.games_failed += other.games_failed;
        self.draws += other.draws;
        self.total_turns += other.total_turns;

        if self.wins.len() < other.wins.len() {
            self.wins.resize(other.wins.len(), 0);
        }
        for (mine, theirs) in self.wins.iter_mut().zip(&other.wins) {
            *mine += theirs;
        }

        self.min_turns = match (self.min_turns, other.min_turns) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_turns = match (self.max_turns, other.max_turns) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Mean turns per played game, 0 when nothing was played.
    #[must_use]
    pub fn mean_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }

    /// Share of played games won by `player`.
    #[must_use]
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player.index()).copied().unwrap_or(0) as f64 / self.games_played as f64
    }
}
