//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use yt_manager::adapters::{
    Album, AlbumRef, AlbumTrack, Extractor, Listing, ListingEntry, ReleaseCatalog,
};

/// Extractor serving canned listings and writing fake audio files
#[derive(Default)]
pub struct FakeExtractor {
    pub listings: HashMap<String, Listing>,
    pub videos: HashMap<String, ListingEntry>,
    pub failing_downloads: Vec<String>,
    pub downloads: AtomicUsize,
    pub downloaded_ids: Mutex<Vec<String>>,
}

impl FakeExtractor {
    pub fn with_listing(mut self, url: &str, listing: Listing) -> Self {
        self.listings.insert(url.to_string(), listing);
        self
    }

    pub fn with_video(mut self, url: &str, entry: ListingEntry) -> Self {
        self.videos.insert(url.to_string(), entry);
        self
    }

    pub fn failing_on(mut self, video_id: &str) -> Self {
        self.failing_downloads.push(video_id.to_string());
        self
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn name(&self) -> &str {
        "fake-extractor"
    }

    async fn extract_flat(&self, url: &str) -> Result<Listing> {
        self.listings
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no listing for {}", url))
    }

    async fn extract_video(&self, url: &str) -> Result<ListingEntry> {
        self.videos
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unsupported URL: {}", url))
    }

    async fn download_audio(&self, video_id: &str, output_dir: &Path) -> Result<PathBuf> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.failing_downloads.iter().any(|id| id == video_id) {
            anyhow::bail!("HTTP Error 403: Forbidden");
        }
        self.downloaded_ids.lock().unwrap().push(video_id.to_string());

        let produced = output_dir.join("track.ogg");
        tokio::fs::write(&produced, format!("audio:{}", video_id)).await?;
        Ok(produced)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Release catalog serving canned albums, or failing on demand
#[derive(Default)]
pub struct FakeReleases {
    pub artists: HashMap<String, Vec<AlbumRef>>,
    pub albums: HashMap<String, Album>,
}

impl FakeReleases {
    pub fn with_album(mut self, channel_id: &str, browse_id: &str, album: Album) -> Self {
        self.artists
            .entry(channel_id.to_string())
            .or_default()
            .push(AlbumRef {
                browse_id: browse_id.to_string(),
                title: album.title.clone(),
            });
        self.albums.insert(browse_id.to_string(), album);
        self
    }
}

#[async_trait]
impl ReleaseCatalog for FakeReleases {
    fn name(&self) -> &str {
        "fake-releases"
    }

    async fn artist_albums(&self, channel_id: &str) -> Result<Vec<AlbumRef>> {
        self.artists
            .get(channel_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("artist {} not found", channel_id))
    }

    async fn album(&self, browse_id: &str) -> Result<Album> {
        self.albums
            .get(browse_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("album {} not found", browse_id))
    }
}

pub fn entry(id: &str, title: &str, duration: Option<f64>) -> ListingEntry {
    ListingEntry {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        duration,
        channel_id: None,
        uploader: Some("Uploader".to_string()),
        artist: None,
        album: None,
    }
}

pub fn channel_listing(channel_id: &str, name: &str, entries: Vec<ListingEntry>) -> Listing {
    Listing {
        id: Some(channel_id.to_string()),
        title: Some(format!("{} - Videos", name)),
        channel: Some(name.to_string()),
        channel_id: Some(channel_id.to_string()),
        uploader: Some(name.to_string()),
        entries: Some(entries),
    }
}

pub fn album_track(id: &str, title: &str, artist: &str) -> AlbumTrack {
    AlbumTrack {
        video_id: Some(id.to_string()),
        title: title.to_string(),
        artists: vec![artist.to_string()],
        duration_seconds: Some(200),
    }
}

pub fn videos_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/channel/{}/videos", channel_id)
}

/// Temporary library with an initialised `.ytm` marker
pub fn temp_library() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join(".ytm")).unwrap();
    temp
}

/// Every entry under `root` by relative path: directories, file contents and
/// symlink targets
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    let mut entries = BTreeMap::new();
    collect(root, root, &mut entries);
    entries
}

fn collect(root: &Path, dir: &Path, entries: &mut BTreeMap<PathBuf, String>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let relative = path.strip_prefix(root).unwrap().to_path_buf();
        let file_type = std::fs::symlink_metadata(&path).unwrap().file_type();

        if file_type.is_symlink() {
            let target = std::fs::read_link(&path).unwrap();
            entries.insert(relative, format!("-> {}", target.display()));
        } else if file_type.is_dir() {
            entries.insert(relative, "dir".to_string());
            collect(root, &path, entries);
        } else {
            entries.insert(relative, std::fs::read_to_string(&path).unwrap());
        }
    }
}
