//! Reading the per-folder markers consumed by `pull`.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use super::materializer::{CHANNEL_MARKER, PLAYLIST_MARKER};
use crate::domain::Source;
use crate::error::{Error, Result};

/// Source recorded in `folder`: `.channel` is checked before `.playlist`
pub async fn read_pull_marker(folder: &Path) -> Result<Source> {
    if let Some(channel_id) = read_trimmed(&folder.join(CHANNEL_MARKER)).await? {
        return Ok(Source::Channel(channel_id));
    }
    if let Some(url) = read_trimmed(&folder.join(PLAYLIST_MARKER)).await? {
        return Ok(Source::Playlist(url));
    }
    Err(Error::MissingPullMarker(folder.to_path_buf()))
}

async fn read_trimmed(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
