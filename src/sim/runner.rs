//! Running games to completion, one at a time or in bulk.

use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::{Mutex, PoisonError};

use super::record::{GameRecord, SimulationSummary};
use super::report::Reporter;
use crate::agents::Agent;
use crate::core::{GameState, PlayerId, Result, RuleConfig, UnoError};

/// Builds the agent for a seat. Called once per seat per game with the
/// game's seed, so no agent outlives its game.
pub type AgentFactory<'a> = dyn Fn(PlayerId, u64) -> Box<dyn Agent> + Sync + 'a;

/// What a failed game does to the rest of the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop and return the first error, in game order.
    #[default]
    AbortRun,
    /// Log the error, count the game as failed, keep going.
    SkipGame,
}

/// Play one game to a terminal state.
///
/// `agents` holds one agent per seat.
pub fn run_game(config: &RuleConfig, seed: u64, agents: &mut [Box<dyn Agent>]) -> Result<GameRecord> {
    play_game(0, config, seed, agents)
}

fn play_game(
    game_index: u64,
    config: &RuleConfig,
    seed: u64,
    agents: &mut [Box<dyn Agent>],
) -> Result<GameRecord> {
    let mut state = GameState::new(config.clone(), seed)?;

    loop {
        if let Some(outcome) = state.outcome() {
            let trace = state.hand_size_trace().iter().cloned().collect();
            let record = GameRecord::new(game_index, seed, outcome, state.turns_played())
                .with_hand_size_trace(trace);
            debug!(
                "Game {game_index} (seed {seed}) over after {} turn(s): {}",
                record.turns, record.reason
            );
            return Ok(record);
        }

        state.step(agents)?;
    }
}

/// Settings for a batch of games.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Number of games.
    pub games: u64,

    /// Game `i` is seeded with `base_seed + i`.
    pub base_seed: u64,

    /// Rules shared by every game.
    pub rules: RuleConfig,

    /// Run games on the rayon pool.
    pub parallel: bool,

    pub error_policy: ErrorPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 10_000,
            base_seed: 0,
            rules: RuleConfig::default(),
            parallel: false,
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_games(mut self, games: u64) -> Self {
        self.games = games;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Seed of game `index`.
    pub fn game_seed(&self, index: u64) -> u64 {
        self.base_seed.wrapping_add(index)
    }
}

/// Per-worker accumulator for parallel runs.
struct Batch {
    summary: SimulationSummary,
    results: Vec<(u64, Result<GameRecord>)>,
}

impl Batch {
    fn new(player_count: usize) -> Self {
        Self {
            summary: SimulationSummary::new(player_count),
            results: Vec::new(),
        }
    }

    fn merge(mut self, other: Batch) -> Self {
        self.summary.merge(&other.summary);
        self.results.extend(other.results);
        self
    }
}

/// Completion ticks shared by parallel workers.
struct LiveProgress<'r> {
    finished: u64,
    reporter: &'r mut dyn Reporter,
}

impl LiveProgress<'_> {
    fn tick(&mut self, total: u64) {
        self.finished += 1;
        self.reporter.on_game_finished(self.finished, total);
    }
}

/// Runs many independent games.
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Play every game, feeding finished games to `reporter` in game order.
    ///
    /// Parallel and sequential runs produce the same records and summary.
    pub fn run(&self, factory: &AgentFactory<'_>, reporter: &mut dyn Reporter) -> Result<SimulationSummary> {
        self.config.rules.validate()?;

        let player_count = self.config.rules.player_count;
        let total = self.config.games;

        let summary = if self.config.parallel {
            self.run_parallel(factory, reporter)?
        } else {
            let mut summary = SimulationSummary::new(player_count);
            for index in 0..total {
                let result = self.play(index, factory);
                reporter.on_game_finished(index + 1, total);
                self.absorb(index, &mut summary, result, reporter)?;
            }
            summary
        };

        info!(
            "Played {} game(s), {} failed: mean {:.2} turns (min {}, max {}), {} without a winner",
            summary.games_played,
            summary.games_failed,
            summary.mean_turns(),
            summary.min_turns.unwrap_or(0),
            summary.max_turns.unwrap_or(0),
            summary.draws
        );
        Ok(summary)
    }

    fn run_parallel(&self, factory: &AgentFactory<'_>, reporter: &mut dyn Reporter) -> Result<SimulationSummary> {
        let player_count = self.config.rules.player_count;
        let total = self.config.games;
        let live = Mutex::new(LiveProgress {
            finished: 0,
            reporter: &mut *reporter,
        });

        let batch = (0..total)
            .into_par_iter()
            .fold(
                || Batch::new(player_count),
                |mut batch, index| {
                    let result = self.play(index, factory);
                    live.lock().unwrap_or_else(PoisonError::into_inner).tick(total);
                    match &result {
                        Ok(record) => batch.summary.add_record(record),
                        Err(_) => batch.summary.add_failure(),
                    }
                    batch.results.push((index, result));
                    batch
                },
            )
            .reduce(|| Batch::new(player_count), Batch::merge);
        drop(live);

        let mut results = batch.results;
        results.sort_by_key(|(index, _)| *index);

        // Replays the results in order so reporting and error handling
        // match a sequential run.
        let mut completed = 0;
        for (index, result) in results {
            match result {
                Ok(record) => {
                    completed += 1;
                    reporter.on_game_complete(completed, total, &record);
                }
                Err(err) => self.on_failure(index, err)?,
            }
        }

        Ok(batch.summary)
    }

    fn play(&self, index: u64, factory: &AgentFactory<'_>) -> Result<GameRecord> {
        let seed = self.config.game_seed(index);
        let mut agents: Vec<Box<dyn Agent>> = PlayerId::all(self.config.rules.player_count)
            .map(|player| factory(player, seed))
            .collect();
        play_game(index, &self.config.rules, seed, &mut agents)
    }

    fn absorb(
        &self,
        index: u64,
        summary: &mut SimulationSummary,
        result: Result<GameRecord>,
        reporter: &mut dyn Reporter,
    ) -> Result<()> {
        match result {
            Ok(record) => {
                summary.add_record(&record);
                reporter.on_game_complete(summary.games_played, self.config.games, &record);
                Ok(())
            }
            Err(err) => {
                self.on_failure(index, err)?;
                summary.add_failure();
                Ok(())
            }
        }
    }

    fn on_failure(&self, index: u64, err: UnoError) -> Result<()> {
        match self.config.error_policy {
            ErrorPolicy::AbortRun => Err(err),
            ErrorPolicy::SkipGame => {
                warn!("Game {index} (seed {}) failed: {err}", self.config.game_seed(index));
                Ok(())
            }
        }
    }
}
