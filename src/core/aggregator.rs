//! Track discovery for channels, playlists and single videos.
//!
//! A channel's tracks come from two sources that are merged by track id:
//! curated releases first, then the raw upload catalog for ids the curated
//! source did not report. Curated metadata is never overwritten.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{Extractor, Listing, ListingEntry, ReleaseCatalog};
use crate::domain::source::channel_videos_url;
use crate::domain::{RawTrack, Track, TrackSet};
use crate::error::{Error, Result};

/// Titles containing any of these (case-insensitive) are skipped
pub const RESTRICTED_KEYWORDS: [&str; 2] = ["live", "interview"];

/// Shortest catalog entry kept, inclusive
pub const MIN_DURATION_SECS: u32 = 60;

/// Catalog entries this long or longer are skipped
pub const MAX_DURATION_SECS: u32 = 1000;

/// Exclusion rules applied to discovered tracks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterRules {
    /// Lower-case substrings that exclude a title
    #[serde(default = "default_keywords")]
    pub restricted_keywords: Vec<String>,

    /// Inclusive lower duration bound in seconds
    #[serde(default = "default_min_duration")]
    pub min_duration: u32,

    /// Exclusive upper duration bound in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration: u32,
}

fn default_keywords() -> Vec<String> {
    RESTRICTED_KEYWORDS.iter().map(|k| k.to_string()).collect()
}
fn default_min_duration() -> u32 {
    MIN_DURATION_SECS
}
fn default_max_duration() -> u32 {
    MAX_DURATION_SECS
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            restricted_keywords: default_keywords(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
        }
    }
}

impl FilterRules {
    /// Whether the title contains a restricted keyword
    pub fn is_restricted(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.restricted_keywords
            .iter()
            .any(|k| title.contains(&k.to_lowercase()))
    }

    /// Whether a catalog duration falls within `[min, max)`; unknown is rejected
    pub fn duration_allowed(&self, duration: Option<f64>) -> bool {
        match duration {
            Some(d) => d >= f64::from(self.min_duration) && d < f64::from(self.max_duration),
            None => false,
        }
    }
}

/// How a metadata source contributed to an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// Source answered; number of tracks it contributed after filtering
    Fetched(usize),

    /// Source failed and was treated as empty
    Unavailable(String),

    /// Source is disabled in the configuration
    Disabled,
}

/// Merged tracks of a channel with per-source status
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub tracks: TrackSet,
    pub releases: SourceStatus,
    pub catalog: SourceStatus,
}

/// A playlist's title and its filtered tracks
#[derive(Debug, Clone)]
pub struct PlaylistListing {
    pub title: String,
    pub tracks: TrackSet,
}

/// Combines curated releases and the extractor catalog
pub struct MetadataAggregator {
    releases: Option<Arc<dyn ReleaseCatalog>>,
    extractor: Arc<dyn Extractor>,
    rules: FilterRules,
}

impl MetadataAggregator {
    /// Create an aggregator; `releases` of `None` disables curated lookup
    pub fn new(
        releases: Option<Arc<dyn ReleaseCatalog>>,
        extractor: Arc<dyn Extractor>,
        rules: FilterRules,
    ) -> Self {
        Self {
            releases,
            extractor,
            rules,
        }
    }

    /// All tracks of a channel, curated releases taking precedence
    #[instrument(skip(self))]
    pub async fn channel_tracks(&self, channel_id: &str) -> Aggregation {
        let (mut tracks, releases) = match &self.releases {
            None => (TrackSet::new(), SourceStatus::Disabled),
            Some(catalog) => match self.release_tracks(catalog.as_ref(), channel_id).await {
                Ok(tracks) => {
                    let count = tracks.len();
                    (tracks, SourceStatus::Fetched(count))
                }
                Err(e) => {
                    warn!(channel_id, error = %e, "Curated releases unavailable, continuing with catalog only");
                    (TrackSet::new(), SourceStatus::Unavailable(e.to_string()))
                }
            },
        };

        let (uploads, catalog) = self.catalog_tracks(&channel_videos_url(channel_id)).await;
        let added = tracks.merge_missing(uploads);
        let catalog = match catalog {
            SourceStatus::Fetched(_) => SourceStatus::Fetched(added),
            other => other,
        };

        info!(
            channel_id,
            total = tracks.len(),
            releases = ?releases,
            catalog = ?catalog,
            "Aggregated channel tracks"
        );

        Aggregation {
            tracks,
            releases,
            catalog,
        }
    }

    /// Curated tracks of a channel; errors are returned, not absorbed
    pub async fn release_tracks(
        &self,
        catalog: &dyn ReleaseCatalog,
        channel_id: &str,
    ) -> Result<TrackSet> {
        let fetch_error = |e: anyhow::Error| Error::MetadataFetchError {
            url: format!("{}:{}", catalog.name(), channel_id),
            reason: format!("{:#}", e),
        };

        let albums = catalog.artist_albums(channel_id).await.map_err(fetch_error)?;
        if albums.is_empty() {
            return Err(Error::MetadataFetchError {
                url: format!("{}:{}", catalog.name(), channel_id),
                reason: "channel has no albums".to_string(),
            });
        }

        let mut tracks = TrackSet::new();
        for album_ref in albums {
            let album = catalog.album(&album_ref.browse_id).await.map_err(fetch_error)?;
            let album_title = if album.title.is_empty() {
                album_ref.title.clone()
            } else {
                album.title.clone()
            };

            for item in album.tracks {
                let Some(video_id) = item.video_id else {
                    continue;
                };
                if self.rules.is_restricted(&item.title) {
                    debug!(title = %item.title, "Skipping restricted release track");
                    continue;
                }

                let artist = item
                    .artists
                    .first()
                    .or_else(|| album.artists.first())
                    .cloned()
                    .unwrap_or_default();
                let raw = RawTrack {
                    id: video_id,
                    channel_id: Some(channel_id.to_string()),
                    title: item.title,
                    artist,
                    album: Some(album_title.clone()),
                    duration: item.duration_seconds.unwrap_or(0),
                };
                match Track::new(raw) {
                    Ok(track) => {
                        tracks.insert_if_absent(track);
                    }
                    Err(e) => warn!(error = %e, "Skipping release track"),
                }
            }
        }

        Ok(tracks)
    }

    /// Filtered catalog tracks for a channel or playlist URL; failures yield an empty set
    pub async fn catalog_tracks(&self, url: &str) -> (TrackSet, SourceStatus) {
        match self.extractor.extract_flat(url).await {
            Ok(listing) => self.listing_tracks(&listing, url),
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(url, error = %reason, "Error getting listing via {}", self.extractor.name());
                (TrackSet::new(), SourceStatus::Unavailable(reason))
            }
        }
    }

    /// Apply filters and fallbacks to every entry of a listing
    pub fn listing_tracks(&self, listing: &Listing, url: &str) -> (TrackSet, SourceStatus) {
        let Some(entries) = &listing.entries else {
            warn!(url, "Listing has no entries");
            return (
                TrackSet::new(),
                SourceStatus::Unavailable("listing has no entries".to_string()),
            );
        };

        let mut tracks = TrackSet::new();
        for entry in entries {
            let title = entry.title.as_deref().unwrap_or_default();
            if self.rules.is_restricted(title) {
                debug!(title, "Skipping restricted catalog entry");
                continue;
            }
            if !self.rules.duration_allowed(entry.duration) {
                debug!(title, duration = ?entry.duration, "Skipping catalog entry outside duration bounds");
                continue;
            }

            match Track::new(catalog_record(entry, listing)) {
                Ok(track) => {
                    debug!(artist = %track.artist, title = %track.title, "Catalog track");
                    tracks.insert_if_absent(track);
                }
                Err(e) => warn!(error = %e, "Skipping catalog entry"),
            }
        }

        let count = tracks.len();
        (tracks, SourceStatus::Fetched(count))
    }

    /// Playlist title and filtered tracks; the title is required
    #[instrument(skip(self))]
    pub async fn playlist(&self, url: &str) -> Result<PlaylistListing> {
        let listing = self
            .extractor
            .extract_flat(url)
            .await
            .map_err(|e| Error::MetadataFetchError {
                url: url.to_string(),
                reason: format!("{:#}", e),
            })?;

        let title = listing
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| listing.id.clone())
            .ok_or_else(|| Error::MetadataFetchError {
                url: url.to_string(),
                reason: "playlist has no title".to_string(),
            })?;

        let (tracks, _) = self.listing_tracks(&listing, url);
        info!(%title, tracks = tracks.len(), "Resolved playlist");

        Ok(PlaylistListing { title, tracks })
    }

    /// Exactly one track for a video URL, without filtering
    #[instrument(skip(self))]
    pub async fn single_track(&self, url: &str) -> Result<Track> {
        let entry = self
            .extractor
            .extract_video(url)
            .await
            .map_err(|e| Error::MetadataFetchError {
                url: url.to_string(),
                reason: format!("{:#}", e),
            })?;

        let artist = first_artist(entry.artist.as_deref())
            .or_else(|| non_empty(entry.uploader.as_deref()))
            .unwrap_or_default();

        Track::new(RawTrack {
            id: entry.id.unwrap_or_default(),
            channel_id: entry.channel_id,
            title: entry.title.unwrap_or_default(),
            artist,
            album: entry.album,
            duration: entry.duration.map(|d| d as i64).unwrap_or(0),
        })
    }
}

/// Build a raw record from a catalog entry with listing-level fallbacks
fn catalog_record(entry: &ListingEntry, listing: &Listing) -> RawTrack {
    let artist = first_artist(entry.artist.as_deref())
        .or_else(|| non_empty(entry.uploader.as_deref()))
        .or_else(|| non_empty(listing.channel.as_deref()))
        .unwrap_or_default();

    // Per-entry channel ids are accurate in playlists mixing channels
    let channel_id = non_empty(entry.channel_id.as_deref())
        .or_else(|| non_empty(listing.channel_id.as_deref()));

    RawTrack {
        id: entry.id.clone().unwrap_or_default(),
        channel_id,
        title: entry.title.clone().unwrap_or_default(),
        artist,
        album: entry.album.clone(),
        duration: entry.duration.map(|d| d as i64).unwrap_or(0),
    }
}

/// First value of a comma-separated artist list
fn first_artist(artists: Option<&str>) -> Option<String> {
    artists
        .and_then(|a| a.split(',').next())
        .and_then(|a| non_empty(Some(a)))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = FilterRules::default();
        assert_eq!(rules.restricted_keywords, vec!["live", "interview"]);
        assert_eq!(rules.min_duration, 60);
        assert_eq!(rules.max_duration, 1000);
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let rules = FilterRules::default();
        assert!(rules.is_restricted("Live in Berlin"));
        assert!(rules.is_restricted("The INTERVIEW"));
        assert!(rules.is_restricted("Deliverance")); // substring match
        assert!(!rules.is_restricted("Studio Session"));
    }

    #[test]
    fn test_duration_bounds() {
        let rules = FilterRules::default();
        assert!(!rules.duration_allowed(None));
        assert!(!rules.duration_allowed(Some(45.0)));
        assert!(!rules.duration_allowed(Some(59.9)));
        assert!(rules.duration_allowed(Some(60.0)));
        assert!(rules.duration_allowed(Some(999.0)));
        assert!(!rules.duration_allowed(Some(1000.0)));
    }

    #[test]
    fn test_artist_fallback_chain() {
        let listing = Listing {
            channel: Some("Channel Name".to_string()),
            channel_id: Some("UCchan".to_string()),
            ..Default::default()
        };
        let mut entry = ListingEntry {
            id: Some("v1".to_string()),
            title: Some("Song".to_string()),
            duration: Some(200.0),
            artist: Some("Main Artist, Feature".to_string()),
            uploader: Some("Uploader".to_string()),
            ..Default::default()
        };

        assert_eq!(catalog_record(&entry, &listing).artist, "Main Artist");

        entry.artist = Some(String::new());
        assert_eq!(catalog_record(&entry, &listing).artist, "Uploader");

        entry.uploader = None;
        assert_eq!(catalog_record(&entry, &listing).artist, "Channel Name");
    }

    #[test]
    fn test_channel_id_fallback() {
        let listing = Listing {
            channel_id: Some("UClisting".to_string()),
            ..Default::default()
        };
        let mut entry = ListingEntry {
            id: Some("v1".to_string()),
            channel_id: Some("UCentry".to_string()),
            ..Default::default()
        };
        assert_eq!(
            catalog_record(&entry, &listing).channel_id.as_deref(),
            Some("UCentry")
        );

        entry.channel_id = None;
        assert_eq!(
            catalog_record(&entry, &listing).channel_id.as_deref(),
            Some("UClisting")
        );
    }
}
