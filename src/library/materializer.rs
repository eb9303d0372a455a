//! Browsable layout on top of the content store.

use std::path::PathBuf;

use tracing::debug;

use super::links::{ensure_association, replace_symlink, write_marker};
use crate::domain::{sanitize_segment, Track, STORE_DIR};
use crate::error::Result;

pub const CHANNELS_DIR: &str = "channels";
pub const PLAYLISTS_DIR: &str = "playlists";
pub const UNSORTED_DIR: &str = "unsorted";
pub const CHANNEL_MARKER: &str = ".channel";
pub const PLAYLIST_MARKER: &str = ".playlist";

/// Creates association files and symlinks for stored tracks
#[derive(Debug, Clone)]
pub struct Materializer {
    root: PathBuf,
}

impl Materializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `.ytm/<channel>`
    pub fn store_channel_dir(&self, channel_id: &str) -> PathBuf {
        self.root.join(STORE_DIR).join(channel_id)
    }

    /// `channels/<artist>`
    pub fn artist_dir(&self, track: &Track) -> PathBuf {
        self.root.join(CHANNELS_DIR).join(&track.artist)
    }

    /// `channels/<artist>/<album or unsorted>/<title>.ogg`
    pub fn browsable_path(&self, track: &Track) -> PathBuf {
        let bucket = track.album.as_deref().unwrap_or(UNSORTED_DIR);
        self.artist_dir(track)
            .join(bucket)
            .join(track.link_file_name())
    }

    /// `playlists/<title>`, with the title sanitized
    pub fn playlist_dir(&self, playlist_title: &str) -> PathBuf {
        self.root
            .join(PLAYLISTS_DIR)
            .join(sanitize_segment(playlist_title))
    }

    /// Associate the track's channel and link it into its artist directory
    ///
    /// The audio must already exist at the track's storage path. Returns the
    /// browsable link.
    pub async fn materialize(&self, track: &Track) -> Result<PathBuf> {
        let channel_id = track.require_channel()?;
        let storage_path = track.storage_path(&self.root)?;

        ensure_association(
            &self.store_channel_dir(channel_id).join(CHANNEL_MARKER),
            channel_id,
        )
        .await?;
        ensure_association(&self.artist_dir(track).join(CHANNEL_MARKER), channel_id).await?;

        let link = self.browsable_path(track);
        replace_symlink(&storage_path, &link).await?;
        debug!(link = %link.display(), "Linked track");

        Ok(link)
    }

    /// Record the playlist URL for later re-pulls; returns the playlist directory
    pub async fn record_playlist(&self, playlist_title: &str, url: &str) -> Result<PathBuf> {
        let dir = self.playlist_dir(playlist_title);
        write_marker(&dir.join(PLAYLIST_MARKER), url).await?;
        Ok(dir)
    }

    /// Add a playlist link to an already stored track
    pub async fn link_into_playlist(&self, track: &Track, playlist_title: &str) -> Result<PathBuf> {
        let storage_path = track.storage_path(&self.root)?;
        let link = self
            .playlist_dir(playlist_title)
            .join(track.link_file_name());
        replace_symlink(&storage_path, &link).await?;
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawTrack;

    fn track(album: Option<&str>) -> Track {
        Track::new(RawTrack {
            id: "vid1".to_string(),
            channel_id: Some("UC1".to_string()),
            title: "Song".to_string(),
            artist: "AC/DC".to_string(),
            album: album.map(str::to_string),
            duration: 200,
        })
        .unwrap()
    }

    #[test]
    fn test_browsable_paths() {
        let m = Materializer::new("/lib");
        assert_eq!(
            m.browsable_path(&track(Some("Highway"))),
            PathBuf::from("/lib/channels/AC_DC/Highway/Song.ogg")
        );
        assert_eq!(
            m.browsable_path(&track(None)),
            PathBuf::from("/lib/channels/AC_DC/unsorted/Song.ogg")
        );
        assert_eq!(
            m.playlist_dir("Best/Of"),
            PathBuf::from("/lib/playlists/Best_Of")
        );
    }
}
