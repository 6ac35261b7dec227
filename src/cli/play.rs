//! Play command: one human seat against bots.

use super::{load_rules, seed_or_now, AgentKind, CliError};
use std::io;
use std::path::PathBuf;
use uno_engine::{Agent, GameState, InteractiveAgent, Phase, PlayerId, TurnEvent};

/// Execute the play command. The human sits in seat 0.
///
/// # Errors
///
/// Returns an error if the rules are invalid or the game fails.
pub(crate) fn execute(
    opponents: usize,
    seed: Option<u64>,
    agent: AgentKind,
    rules: Option<PathBuf>,
) -> Result<(), CliError> {
    let rules = load_rules(rules.as_deref(), opponents + 1)?;
    let seed = seed_or_now(seed);

    let mut agents: Vec<Box<dyn Agent>> = Vec::with_capacity(rules.player_count);
    agents.push(Box::new(InteractiveAgent::new("you", io::stdin().lock(), io::stdout())));
    for player in PlayerId::all(rules.player_count).skip(1) {
        agents.push(agent.build(player, seed));
    }

    let mut state = GameState::new(rules, seed)?;
    println!("Game seed {seed}. You are {}.", PlayerId::new(0));

    let mut shown = 0;
    while !state.is_terminal() {
        state.step(&mut agents)?;

        for record in state.history().iter().skip(shown) {
            let name = agents[record.player.index()].name();
            match &record.event {
                TurnEvent::Played(mv) => println!("{name} plays {mv}"),
                TurnEvent::Drew { count, .. } => println!("{name} draws {count}"),
                TurnEvent::PenaltyDrawn { count } => println!("{name} draws {count} and loses the turn"),
                TurnEvent::PenaltyVoided { count } => println!("{name} would draw {count}, but the deck is spent"),
                TurnEvent::Skipped => println!("{name} is skipped"),
            }
        }
        shown = state.history().len();
    }

    if let Phase::Terminal(outcome) = state.phase() {
        match outcome.winner {
            Some(winner) => println!("{} wins after {} turns", agents[winner.index()].name(), state.turns_played()),
            None => println!("No winner ({}) after {} turns", outcome.reason, state.turns_played()),
        }
    }

    Ok(())
}
