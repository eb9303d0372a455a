//! Adapter interfaces for external systems.
//!
//! Two collaborators feed the library:
//! - an [`Extractor`] (yt-dlp) that lists channel/playlist uploads and
//!   downloads audio
//! - a [`ReleaseCatalog`] (YouTube Music) that knows a channel's curated
//!   albums

pub mod ytdlp;
pub mod ytmusic;

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub use ytdlp::YtDlpAdapter;
pub use ytmusic::YtMusicClient;

/// Flat listing of a channel, playlist or single video
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Channel display name
    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default)]
    pub channel_id: Option<String>,

    #[serde(default)]
    pub uploader: Option<String>,

    /// Absent when the URL did not resolve to a collection
    #[serde(default)]
    pub entries: Option<Vec<ListingEntry>>,
}

/// One video in a listing, or the metadata of a single video
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingEntry {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Seconds; yt-dlp reports fractional values for some extractors
    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(default)]
    pub channel_id: Option<String>,

    #[serde(default)]
    pub uploader: Option<String>,

    /// Comma-separated artist list when the platform knows it
    #[serde(default)]
    pub artist: Option<String>,

    #[serde(default)]
    pub album: Option<String>,
}

/// Reference to a curated album on an artist page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRef {
    pub browse_id: String,
    pub title: String,
}

/// A curated album with its tracks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Album {
    pub title: String,

    /// Album-level artists, used when a track lists none
    pub artists: Vec<String>,

    pub tracks: Vec<AlbumTrack>,
}

/// A track on a curated album
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumTrack {
    /// Missing for tracks that are not playable as videos
    pub video_id: Option<String>,
    pub title: String,
    pub artists: Vec<String>,
    pub duration_seconds: Option<i64>,
}

/// Generic video metadata extractor and audio downloader
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// List a channel or playlist without downloading anything
    async fn extract_flat(&self, url: &str) -> Result<Listing>;

    /// Full metadata of a single video
    async fn extract_video(&self, url: &str) -> Result<ListingEntry>;

    /// Download best audio for `video_id` into `output_dir`, transcoded to
    /// Vorbis with container tags; returns the produced file
    async fn download_audio(&self, video_id: &str, output_dir: &Path) -> Result<PathBuf>;

    /// Check that the backend is usable
    async fn health_check(&self) -> Result<()>;
}

/// Curated album metadata for a channel
#[async_trait]
pub trait ReleaseCatalog: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Albums and singles released by the channel's artist
    async fn artist_albums(&self, channel_id: &str) -> Result<Vec<AlbumRef>>;

    /// Tracks of one album
    async fn album(&self, browse_id: &str) -> Result<Album>;
}
