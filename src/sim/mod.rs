//! Simulation driver.
//!
//! ## Usage
//!
//! ```
//! use uno_engine::agents::{Agent, GreedyAgent};
//! use uno_engine::core::{PlayerId, RuleConfig};
//! use uno_engine::sim::{RecordCollector, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::new()
//!     .with_games(10)
//!     .with_base_seed(42)
//!     .with_rules(RuleConfig::new(4));
//!
//! let factory = |_: PlayerId, _: u64| -> Box<dyn Agent> { Box::new(GreedyAgent::new()) };
//! let mut records = RecordCollector::new();
//! let summary = Simulation::new(config).run(&factory, &mut records).unwrap();
//!
//! assert_eq!(summary.games_played, 10);
//! assert_eq!(records.records().len(), 10);
//! ```
//!
//! Game `i` of a run is seeded with `base_seed + i`, and agents are built
//! fresh for every game, so a run is reproducible game by game and the
//! parallel mode yields the same records as the sequential one.

pub mod record;
pub mod report;
pub mod runner;

pub use record::{GameRecord, SimulationSummary};
pub use report::{RecordCollector, Reporter};
pub use runner::{run_game, AgentFactory, ErrorPolicy, Simulation, SimulationConfig};
