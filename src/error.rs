//! Error kinds surfaced by the library.
//!
//! Curated-release lookup failures never reach this type: the aggregator
//! absorbs them (see [`crate::core::aggregator::SourceStatus`]).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while discovering, downloading or materializing tracks
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not find a .ytm directory above {0}")]
    RootNotFound(PathBuf),

    #[error("Invalid track data: {0}")]
    InvalidTrackData(String),

    #[error("Failed to fetch metadata for {url}: {reason}")]
    MetadataFetchError { url: String, reason: String },

    #[error("Failed to download track {track_id}: {reason}")]
    DownloadFailure { track_id: String, reason: String },

    #[error("Could not find .channel or .playlist file in {0}")]
    MissingPullMarker(PathBuf),

    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Library result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;
