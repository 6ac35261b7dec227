//! Simulate command implementation.

use super::output::{format_summary_text, JsonSummary};
use super::{load_rules, seed_or_now, AgentKind, CliError, SummaryFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use uno_engine::{Agent, ErrorPolicy, GameRecord, PlayerId, Reporter, Simulation, SimulationConfig};

/// Arguments of the `simulate` command.
pub(crate) struct SimulateArgs {
    pub(crate) games: u64,
    pub(crate) players: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) agent: AgentKind,
    pub(crate) rules: Option<PathBuf>,
    pub(crate) parallel: bool,
    pub(crate) threads: Option<usize>,
    pub(crate) skip_failed: bool,
    pub(crate) format: SummaryFormat,
    pub(crate) progress: bool,
}

/// Drives an optional progress bar.
struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    fn new(games: u64, enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let bar = ProgressBar::new(games);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            {
                bar.set_style(style.progress_chars("=>-"));
            }
            bar
        });
        Self { bar }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("done");
        }
    }
}

impl Reporter for ProgressReporter {
    fn on_game_complete(&mut self, _completed: u64, _total: u64, _record: &GameRecord) {}

    fn on_game_finished(&mut self, finished: u64, _total: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(finished);
        }
    }
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the rules are invalid or a game fails under the
/// abort policy.
pub(crate) fn execute(args: SimulateArgs) -> Result<(), CliError> {
    let rules = load_rules(args.rules.as_deref(), args.players)?;

    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_now(args.seed);
    let error_policy = if args.skip_failed {
        ErrorPolicy::SkipGame
    } else {
        ErrorPolicy::AbortRun
    };

    let config = SimulationConfig::new()
        .with_games(args.games)
        .with_base_seed(base_seed)
        .with_rules(rules)
        .with_parallel(args.parallel)
        .with_error_policy(error_policy);

    let agent_names: Vec<String> = PlayerId::all(args.players)
        .map(|player| args.agent.build(player, base_seed).name().to_string())
        .collect();

    let kind = args.agent;
    let factory = move |player: PlayerId, seed: u64| -> Box<dyn Agent> { kind.build(player, seed) };

    let mut reporter = ProgressReporter::new(args.games, args.progress);
    let start = Instant::now();
    let summary = Simulation::new(config).run(&factory, &mut reporter)?;
    reporter.finish();
    let duration = start.elapsed();

    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        summary.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match args.format {
        SummaryFormat::Text => {
            println!();
            print!("{}", format_summary_text(&summary, &agent_names));
            println!();
            println!("Seed: {base_seed}");
            println!("Duration: {:.2}s ({:.0} games/sec)", duration.as_secs_f64(), games_per_sec);
        }
        SummaryFormat::Json => {
            let json_result = JsonSummary {
                agents: &agent_names,
                base_seed,
                mean_turns: summary.mean_turns(),
                summary: &summary,
            };
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
