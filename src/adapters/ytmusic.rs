//! YouTube Music client for curated release metadata.
//!
//! Talks to the public InnerTube `browse` endpoint the web client uses. Only
//! the pieces needed for album discovery are parsed: the album shelves on an
//! artist page and the track shelf on an album page.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{Album, AlbumRef, AlbumTrack, ReleaseCatalog};

const BROWSE_URL: &str = "https://music.youtube.com/youtubei/v1/browse?alt=json";
const ORIGIN: &str = "https://music.youtube.com";
const CLIENT_NAME: &str = "WEB_REMIX";
const CLIENT_VERSION: &str = "1.20240101.01.00";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Artist page shelves that hold releases
const RELEASE_SHELVES: [&str; 2] = ["Albums", "Singles"];

/// YouTube Music InnerTube client
pub struct YtMusicClient {
    /// Interface language sent with every request
    language: String,
    /// HTTP client
    client: reqwest::Client,
}

impl Default for YtMusicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YtMusicClient {
    /// Create a client using English shelf titles
    pub fn new() -> Self {
        Self {
            language: "en".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the request body for a browse call
    fn browse_body(&self, browse_id: &str) -> Value {
        serde_json::json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                    "hl": self.language,
                }
            },
            "browseId": browse_id,
        })
    }

    async fn browse(&self, browse_id: &str) -> Result<Value> {
        let response = self
            .client
            .post(BROWSE_URL)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ORIGIN, ORIGIN)
            .json(&self.browse_body(browse_id))
            .send()
            .await
            .with_context(|| format!("Failed to browse {}", browse_id))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("YouTube Music returned {} for {}", status, browse_id);
        }

        response
            .json()
            .await
            .context("Failed to parse YouTube Music response")
    }
}

#[async_trait]
impl ReleaseCatalog for YtMusicClient {
    fn name(&self) -> &str {
        "ytmusic"
    }

    async fn artist_albums(&self, channel_id: &str) -> Result<Vec<AlbumRef>> {
        let page = self.browse(channel_id).await?;
        parse_album_refs(&page)
    }

    async fn album(&self, browse_id: &str) -> Result<Album> {
        let page = self.browse(browse_id).await?;
        parse_album(&page)
    }
}

/// Text of every run in a `{ runs: [...] }` node
fn run_texts(runs: Option<&Value>) -> Vec<String> {
    runs.and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|r| r.get("text").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Texts of runs that link somewhere (artist names, not separators)
fn linked_run_texts(runs: Option<&Value>) -> Vec<String> {
    runs.and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter(|r| r.get("navigationEndpoint").is_some())
                .filter_map(|r| r.get("text").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn first_text(node: &Value, pointer: &str) -> Option<String> {
    node.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse `m:ss` or `h:mm:ss` into seconds
pub fn parse_duration(text: &str) -> Option<i64> {
    text.trim()
        .split(':')
        .try_fold(0i64, |acc, part| part.parse::<i64>().ok().map(|n| acc * 60 + n))
}

/// Album and single references from an artist page
pub fn parse_album_refs(page: &Value) -> Result<Vec<AlbumRef>> {
    let sections = page
        .pointer("/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents")
        .and_then(Value::as_array)
        .context("Artist page has no sections")?;

    let mut albums = Vec::new();
    for shelf in sections.iter().filter_map(|s| s.get("musicCarouselShelfRenderer")) {
        let title = first_text(
            shelf,
            "/header/musicCarouselShelfBasicHeaderRenderer/title/runs/0/text",
        )
        .unwrap_or_default();
        if !RELEASE_SHELVES.contains(&title.as_str()) {
            continue;
        }

        let items = shelf.get("contents").and_then(Value::as_array);
        for item in items.into_iter().flatten() {
            let Some(item) = item.get("musicTwoRowItemRenderer") else {
                continue;
            };
            let browse_id = first_text(item, "/navigationEndpoint/browseEndpoint/browseId")
                .or_else(|| {
                    first_text(item, "/title/runs/0/navigationEndpoint/browseEndpoint/browseId")
                });
            if let Some(browse_id) = browse_id {
                albums.push(AlbumRef {
                    browse_id,
                    title: first_text(item, "/title/runs/0/text").unwrap_or_default(),
                });
            }
        }
    }

    Ok(albums)
}

/// Album header and tracks from an album page (current and legacy layouts)
pub fn parse_album(page: &Value) -> Result<Album> {
    const RESPONSIVE_HEADER: &str = "/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/musicResponsiveHeaderRenderer";
    const LEGACY_HEADER: &str = "/header/musicDetailHeaderRenderer";

    let shelf = page
        .pointer("/contents/twoColumnBrowseResultsRenderer/secondaryContents/sectionListRenderer/contents/0/musicShelfRenderer/contents")
        .or_else(|| {
            page.pointer("/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/musicShelfRenderer/contents")
        })
        .and_then(Value::as_array)
        .context("Album page has no track shelf")?;

    let (title, artists) = if let Some(header) = page.pointer(RESPONSIVE_HEADER) {
        (
            first_text(header, "/title/runs/0/text"),
            run_texts(header.pointer("/straplineTextOne/runs")),
        )
    } else if let Some(header) = page.pointer(LEGACY_HEADER) {
        (
            first_text(header, "/title/runs/0/text"),
            linked_run_texts(header.pointer("/subtitle/runs")),
        )
    } else {
        (None, Vec::new())
    };

    let tracks = shelf
        .iter()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .map(|item| AlbumTrack {
            video_id: first_text(item, "/playlistItemData/videoId"),
            title: first_text(
                item,
                "/flexColumns/0/musicResponsiveListItemFlexColumnRenderer/text/runs/0/text",
            )
            .unwrap_or_default(),
            artists: linked_run_texts(
                item.pointer("/flexColumns/1/musicResponsiveListItemFlexColumnRenderer/text/runs"),
            ),
            duration_seconds: first_text(
                item,
                "/fixedColumns/0/musicResponsiveListItemFixedColumnRenderer/text/runs/0/text",
            )
            .and_then(|d| parse_duration(&d)),
        })
        .collect();

    Ok(Album {
        title: title.unwrap_or_default(),
        artists,
        tracks,
    })
}
