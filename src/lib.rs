//! yt-manager - YouTube-backed music library organizer
//!
//! Discovers the tracks of a channel or playlist, downloads their audio into
//! a content-addressed store, and keeps a browsable tree of symlinks by
//! artist/album and by playlist.
//!
//! # Architecture
//!
//! - Tracks from curated releases and the raw upload catalog are merged by
//!   track id, curated metadata taking precedence
//! - Audio is stored once per `(channel, track id)` under `.ytm/`
//! - Browsable paths are relative symlinks, recreated on every run
//!
//! # Modules
//!
//! - `adapters`: External systems (yt-dlp, YouTube Music)
//! - `core`: Discovery and download orchestration
//! - `domain`: Data structures (Track, TrackSet, Source)
//! - `library`: On-disk layout (root discovery, materialization)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Create a library in the current directory
//! yt-manager init
//!
//! # Download a channel or a playlist
//! yt-manager download https://www.youtube.com/channel/UC...
//! yt-manager download "https://www.youtube.com/playlist?list=PL..."
//!
//! # Refresh a previously downloaded artist or playlist folder
//! yt-manager pull channels/Artist
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod library;

// Re-export main types at crate root for convenience
pub use crate::core::{FilterRules, MetadataAggregator, Orchestrator, SourceStatus};
pub use domain::{BatchReport, RawTrack, Source, Track, TrackOutcome, TrackSet, TrackState};
pub use error::{Error, Result};
pub use library::{find_library_root, init_library, Materializer};
