//! Progress and record sinks for a simulation run.

use super::record::GameRecord;

/// Receives each finished game, in game order.
///
/// Implementors must be `Send`: parallel runs call `on_game_finished` from
/// worker threads.
pub trait Reporter: Send {
    /// `completed` counts finished games so far and only ever increases.
    fn on_game_complete(&mut self, completed: u64, total: u64, record: &GameRecord);

    /// Called as soon as any game ends, failed or not, in completion order.
    ///
    /// In parallel runs this arrives while other games are still playing,
    /// well before the ordered `on_game_complete` calls.
    fn on_game_finished(&mut self, _finished: u64, _total: u64) {}
}

/// Discards everything.
impl Reporter for () {
    fn on_game_complete(&mut self, _completed: u64, _total: u64, _record: &GameRecord) {}
}

/// Keeps every record, for plotting or export.
#[derive(Clone, Debug, Default)]
pub struct RecordCollector {
    records: Vec<GameRecord>,
}

impl RecordCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<GameRecord> {
        self.records
    }
}

impl Reporter for RecordCollector {
    fn on_game_complete(&mut self, _completed: u64, _total: u64, record: &GameRecord) {
        self.records.push(record.clone());
    }
}
