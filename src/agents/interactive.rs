//! A human player at a terminal.
//!
//! The agent is generic over its input and output so the prompt loop can be
//! driven from a test with in-memory buffers, or from stdin/stdout in a
//! real session.

use std::io::{BufRead, Write};

use log::warn;

use super::Agent;
use crate::core::{Move, PlayerView};

/// Prompts for a numbered choice until a valid one is entered.
///
/// When input ends or an IO error occurs the first legal move is played so
/// the game can still finish.
pub struct InteractiveAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveAgent<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    /// Consume the agent, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn show(&mut self, view: &PlayerView<'_>, legal: &[Move]) -> std::io::Result<()> {
        writeln!(
            self.output,
            "Turn {} | top: {} | color: {} | draw pile: {}",
            view.turn, view.top_card, view.active_color, view.draw_pile_size
        )?;
        if view.pending_draw > 0 {
            writeln!(self.output, "You face a penalty of {} card(s)", view.pending_draw)?;
        }

        let hand: Vec<String> = view.hand.iter().map(ToString::to_string).collect();
        writeln!(self.output, "Your hand: {}", hand.join(", "))?;

        for (i, mv) in legal.iter().enumerate() {
            writeln!(self.output, "  {}) {mv}", i + 1)?;
        }
        Ok(())
    }

    /// Read choices until one parses. `None` on end of input.
    fn read_choice(&mut self, count: usize) -> std::io::Result<Option<usize>> {
        loop {
            write!(self.output, "Choose 1-{count}: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=count).contains(&choice) => return Ok(Some(choice - 1)),
                _ => writeln!(self.output, "'{}' is not a valid choice", line.trim())?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Agent for InteractiveAgent<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, view: &PlayerView<'_>, legal: &[Move]) -> Move {
        let choice = self
            .show(view, legal)
            .and_then(|()| self.read_choice(legal.len()));

        match choice {
            Ok(Some(index)) => legal[index],
            Ok(None) => {
                warn!("{}: input closed, playing {}", self.name, legal[0]);
                legal[0]
            }
            Err(err) => {
                warn!("{}: {err}, playing {}", self.name, legal[0]);
                legal[0]
            }
        }
    }
}
