//! Download orchestration.
//!
//! Sequences "fetch metadata → for each track: skip-if-exists → download →
//! materialize". Tracks are processed one at a time; the first failure
//! aborts the remaining tracks of the batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{info, instrument};

use crate::adapters::{Extractor, ReleaseCatalog, YtDlpAdapter, YtMusicClient};
use crate::config::ResolvedConfig;
use crate::domain::{BatchReport, Source, Track, TrackOutcome, TrackState, STORE_DIR};
use crate::error::{Error, Result};
use crate::library::{read_pull_marker, Materializer};

use super::aggregator::{FilterRules, MetadataAggregator};

/// Main download orchestrator for one library root
pub struct Orchestrator {
    root: PathBuf,
    extractor: Arc<dyn Extractor>,
    aggregator: MetadataAggregator,
    materializer: Materializer,
}

impl Orchestrator {
    /// Create an orchestrator over explicit adapters
    pub fn new(
        root: impl Into<PathBuf>,
        extractor: Arc<dyn Extractor>,
        releases: Option<Arc<dyn ReleaseCatalog>>,
        rules: FilterRules,
    ) -> Self {
        let root = root.into();
        Self {
            aggregator: MetadataAggregator::new(releases, extractor.clone(), rules),
            materializer: Materializer::new(root.clone()),
            extractor,
            root,
        }
    }

    /// Create an orchestrator with the production adapters
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let extractor: Arc<dyn Extractor> =
            Arc::new(YtDlpAdapter::with_binary_path(config.ytdlp_binary.clone()));
        let releases: Option<Arc<dyn ReleaseCatalog>> = if config.ytmusic_enabled {
            Some(Arc::new(YtMusicClient::new()))
        } else {
            None
        };
        Self::new(
            config.root.clone(),
            extractor,
            releases,
            config.filters.clone(),
        )
    }

    /// Download whatever a classified source refers to
    pub async fn download_source(&self, source: &Source) -> Result<BatchReport> {
        match source {
            Source::Channel(channel_id) => self.download_channel(channel_id).await,
            Source::Playlist(url) => self.download_playlist(url).await,
        }
    }

    /// Re-run the download recorded in `folder`'s `.channel` or `.playlist`
    pub async fn pull(&self, folder: &Path) -> Result<BatchReport> {
        let source = read_pull_marker(folder).await?;
        info!(folder = %folder.display(), %source, "Pulling");
        self.download_source(&source).await
    }

    /// Download every track of a channel
    #[instrument(skip(self))]
    pub async fn download_channel(&self, channel_id: &str) -> Result<BatchReport> {
        let aggregation = self.aggregator.channel_tracks(channel_id).await;

        let mut report = BatchReport::default();
        for track in aggregation.tracks.iter() {
            report.record(self.download_track(track).await?);
        }

        info!(
            total = report.total(),
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            "Channel done"
        );
        Ok(report)
    }

    /// Download every track of a playlist and link it under `playlists/`
    #[instrument(skip(self))]
    pub async fn download_playlist(&self, url: &str) -> Result<BatchReport> {
        let playlist = self.aggregator.playlist(url).await?;
        self.materializer.record_playlist(&playlist.title, url).await?;

        let mut report = BatchReport::default();
        for track in playlist.tracks.iter() {
            let outcome = self.download_track(track).await?;
            self.materializer
                .link_into_playlist(track, &playlist.title)
                .await?;
            report.record(outcome);
        }

        info!(
            title = %playlist.title,
            total = report.total(),
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            "Playlist done"
        );
        Ok(report)
    }

    /// Resolve and download a single video, bypassing filters
    #[instrument(skip(self))]
    pub async fn download_single(&self, url: &str) -> Result<TrackOutcome> {
        let track = self.aggregator.single_track(url).await?;
        self.download_track(&track).await
    }

    /// Ensure one track is stored and linked
    #[instrument(skip(self, track), fields(track_id = %track.id))]
    pub async fn download_track(&self, track: &Track) -> Result<TrackOutcome> {
        let storage_path = track.storage_path(&self.root)?;

        let state = if fs::try_exists(&storage_path).await? {
            info!("Track {} already exists, skipping...", track.title);
            TrackState::Skipped
        } else {
            info!("will download track {}", storage_path.display());
            self.fetch_into_store(track, &storage_path).await?;
            TrackState::Materialized
        };

        let link = self.materializer.materialize(track).await?;

        Ok(TrackOutcome {
            track_id: track.id.clone(),
            state,
            link,
        })
    }

    /// Download into a private workspace and move the result into the store
    ///
    /// The workspace lives under `.ytm/` so the final rename stays on one
    /// filesystem; it is removed when this function returns.
    async fn fetch_into_store(&self, track: &Track, storage_path: &Path) -> Result<()> {
        let store_dir = self.root.join(STORE_DIR);
        fs::create_dir_all(&store_dir).await?;
        let workspace = tempfile::Builder::new()
            .prefix(".download-")
            .tempdir_in(&store_dir)?;

        let produced = self
            .extractor
            .download_audio(&track.id, workspace.path())
            .await
            .map_err(|e| Error::DownloadFailure {
                track_id: track.id.clone(),
                reason: format!("{:#}", e),
            })?;

        if let Some(parent) = storage_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        info!("moving {} to {}", produced.display(), storage_path.display());
        fs::rename(&produced, storage_path).await?;

        Ok(())
    }
}
