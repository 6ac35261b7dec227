//! uno-sim - run batches of Uno games, or play one against the bots.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// uno-sim - A deterministic Uno simulator
#[derive(Parser, Debug)]
#[command(name = "uno-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run many games between bots and aggregate statistics
    Simulate {
        /// Number of games to run (default: 10000)
        #[arg(short, long, default_value = "10000")]
        games: u64,

        /// Players per game, 2-10 (default: 6)
        #[arg(short = 'n', long, default_value = "6")]
        players: usize,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Bot used for every seat
        #[arg(short, long, default_value = "greedy")]
        agent: cli::AgentKind,

        /// JSON rule file (player count is taken from --players)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Run games in parallel
        #[arg(long)]
        parallel: bool,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Skip failed games instead of aborting the run
        #[arg(long)]
        skip_failed: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::SummaryFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Play one game at the terminal against bots
    Play {
        /// Opponents (default: 3)
        #[arg(short, long, default_value = "3")]
        opponents: usize,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Bot used for the other seats
        #[arg(short, long, default_value = "greedy")]
        agent: cli::AgentKind,

        /// JSON rule file
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::logger::init(args.verbose);

    let result = match args.command {
        Commands::Simulate {
            games,
            players,
            seed,
            agent,
            rules,
            parallel,
            threads,
            skip_failed,
            format,
            progress,
        } => cli::simulate::execute(cli::simulate::SimulateArgs {
            games,
            players,
            seed,
            agent,
            rules,
            parallel,
            threads,
            skip_failed,
            format,
            progress,
        }),

        Commands::Play {
            opponents,
            seed,
            agent,
            rules,
        } => cli::play::execute(opponents, seed, agent, rules),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
