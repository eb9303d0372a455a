//! Per-track and per-batch download results.

use std::path::PathBuf;

/// Terminal state of a single track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Audio already in the store, only links refreshed
    Skipped,

    /// Downloaded, stored and linked
    Materialized,
}

/// Result of processing one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOutcome {
    pub track_id: String,
    pub state: TrackState,

    /// Browsable link created for the track
    pub link: PathBuf,
}

/// Summary of a channel or playlist download
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<TrackOutcome>,
}

impl BatchReport {
    pub fn record(&mut self, outcome: TrackOutcome) {
        self.outcomes.push(outcome);
    }

    /// Tracks that were actually downloaded
    pub fn downloaded(&self) -> usize {
        self.count(TrackState::Materialized)
    }

    /// Tracks already present in the store
    pub fn skipped(&self) -> usize {
        self.count(TrackState::Skipped)
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    fn count(&self, state: TrackState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }
}
