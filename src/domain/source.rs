//! Classification of user-supplied download targets.

/// URL prefix identifying a playlist
pub const PLAYLIST_URL_PREFIX: &str = "https://www.youtube.com/playlist?list=";

/// What a `download`/`pull` target refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Playlist, kept as the full URL
    Playlist(String),

    /// Channel, reduced to its id
    Channel(String),
}

impl Source {
    /// Classify a target: playlist URLs by prefix, everything else is a channel
    pub fn classify(target: &str) -> Self {
        let target = target.trim();
        if target.starts_with(PLAYLIST_URL_PREFIX) {
            Source::Playlist(target.to_string())
        } else {
            Source::Channel(channel_id_from(target))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Playlist(url) => write!(f, "playlist {}", url),
            Source::Channel(id) => write!(f, "channel {}", id),
        }
    }
}

/// Extract the id from a `/channel/<id>` URL, or return the input as-is
pub fn channel_id_from(target: &str) -> String {
    match target.split_once("/channel/") {
        Some((_, rest)) => rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(rest)
            .to_string(),
        None => target.to_string(),
    }
}

/// Catalog listing URL for a channel's uploads
pub fn channel_videos_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/channel/{}/videos", channel_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_classification() {
        let url = "https://www.youtube.com/playlist?list=PL1234";
        assert_eq!(Source::classify(url), Source::Playlist(url.to_string()));
    }

    #[test]
    fn test_everything_else_is_a_channel() {
        assert_eq!(
            Source::classify("UCabcdef"),
            Source::Channel("UCabcdef".to_string())
        );
        assert_eq!(
            Source::classify("https://www.youtube.com/channel/UCabcdef/videos"),
            Source::Channel("UCabcdef".to_string())
        );
        assert_eq!(
            Source::classify("https://www.youtube.com/channel/UCabcdef?si=x"),
            Source::Channel("UCabcdef".to_string())
        );
        // Watch URLs are not playlists
        assert!(matches!(
            Source::classify("https://www.youtube.com/watch?v=abc&list=PL1"),
            Source::Channel(_)
        ));
    }

    #[test]
    fn test_channel_videos_url() {
        assert_eq!(
            channel_videos_url("UC1"),
            "https://www.youtube.com/channel/UC1/videos"
        );
    }
}
