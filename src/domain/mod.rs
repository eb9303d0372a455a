//! Domain types for yt-manager.
//!
//! This module contains the core data structures:
//! - Track: Validated, path-safe track metadata
//! - TrackSet: Tracks deduplicated by id
//! - Source: Playlist/channel classification of download targets
//! - Outcome: Per-track and per-batch download results

pub mod outcome;
pub mod source;
pub mod track;
pub mod track_set;

// Re-export commonly used types
pub use outcome::{BatchReport, TrackOutcome, TrackState};
pub use source::Source;
pub use track::{sanitize_segment, RawTrack, Track, AUDIO_EXT, STORE_DIR};
pub use track_set::TrackSet;
