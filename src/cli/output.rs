//! Summary formatting.

use serde::Serialize;

use uno_engine::{PlayerId, SimulationSummary};

/// Format a run summary as text.
pub(super) fn format_summary_text(summary: &SimulationSummary, agent_names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Simulation Results ({} games)\n", summary.games_played));
    output.push_str("========================================\n\n");

    if summary.games_failed > 0 {
        output.push_str(&format!("Failed games: {}\n\n", summary.games_failed));
    }

    output.push_str("Turns:\n");
    output.push_str(&format!("  Average: {:.2}\n", summary.mean_turns()));
    output.push_str(&format!("  Min: {}\n", summary.min_turns.unwrap_or(0)));
    output.push_str(&format!("  Max: {}\n\n", summary.max_turns.unwrap_or(0)));

    output.push_str("Win Rates:\n");
    for (i, name) in agent_names.iter().enumerate() {
        let wins = summary.wins.get(i).copied().unwrap_or(0);
        let rate = summary.win_rate(PlayerId::new(i as u8)) * 100.0;
        output.push_str(&format!("  Player {i} ({name}): {rate:.1}% ({wins} wins)\n"));
    }
    output.push_str(&format!("  No winner: {}\n", summary.draws));

    output
}

/// JSON report.
#[derive(Serialize)]
pub(super) struct JsonSummary<'a> {
    pub(super) agents: &'a [String],
    pub(super) base_seed: u64,
    pub(super) mean_turns: f64,
    #[serde(flatten)]
    pub(super) summary: &'a SimulationSummary,
}
