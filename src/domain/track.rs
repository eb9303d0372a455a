//! Canonical track representation.
//!
//! Every metadata source produces a [`RawTrack`]; [`Track::new`] validates it
//! and applies path sanitization so the same rules hold regardless of where
//! the metadata came from.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Marker directory at the library root, doubling as the content store
pub const STORE_DIR: &str = ".ytm";

/// Extension of every stored track (Vorbis in an Ogg container)
pub const AUDIO_EXT: &str = "ogg";

/// Make `value` safe as a single path segment
///
/// Path separators become `_`. Segments that would name the current or
/// parent directory (`.`, `..`) or nothing at all get a leading `_` instead.
pub fn sanitize_segment(value: &str) -> String {
    let segment = value.replace('/', "_");
    match segment.as_str() {
        "" => "_".to_string(),
        "." | ".." => segment.replacen('.', "_", 1),
        _ => segment,
    }
}

/// Unvalidated track metadata as reported by a source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTrack {
    pub id: String,
    pub channel_id: Option<String>,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: i64,
}

/// A validated, path-safe track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Stable platform id (deduplication key and store filename stem)
    pub id: String,

    /// Owning channel, absent until resolved for some playlist entries
    pub channel_id: Option<String>,

    pub title: String,
    pub artist: String,

    /// Album title, `None` routes the track into `unsorted`
    pub album: Option<String>,

    /// Duration in seconds
    pub duration: u32,
}

impl Track {
    /// Validate and sanitize a raw record
    pub fn new(raw: RawTrack) -> Result<Self> {
        if raw.id.trim().is_empty() {
            return Err(Error::InvalidTrackData("missing track id".to_string()));
        }
        if raw.title.trim().is_empty() {
            return Err(Error::InvalidTrackData(format!(
                "track {} has no title",
                raw.id
            )));
        }
        if raw.artist.trim().is_empty() {
            return Err(Error::InvalidTrackData(format!(
                "track {} has no artist",
                raw.id
            )));
        }
        let channel_id = raw.channel_id.filter(|c| !c.trim().is_empty());
        // Ids name store files and directories verbatim
        for id in std::iter::once(&raw.id).chain(channel_id.as_ref()) {
            if sanitize_segment(id) != *id {
                return Err(Error::InvalidTrackData(format!(
                    "id {:?} is not usable as a path segment",
                    id
                )));
            }
        }
        let duration = u32::try_from(raw.duration).map_err(|_| {
            Error::InvalidTrackData(format!(
                "track {} has invalid duration {}",
                raw.id, raw.duration
            ))
        })?;

        Ok(Self {
            id: raw.id,
            channel_id,
            title: sanitize_segment(&raw.title),
            artist: sanitize_segment(&raw.artist),
            album: raw
                .album
                .filter(|a| !a.trim().is_empty())
                .map(|a| sanitize_segment(&a)),
            duration,
        })
    }

    /// Channel id, failing if it was never resolved
    pub fn require_channel(&self) -> Result<&str> {
        self.channel_id.as_deref().ok_or_else(|| {
            Error::InvalidTrackData(format!("track {} has no channel id", self.id))
        })
    }

    /// Store path relative to the library root: `.ytm/<channel>/<id>.ogg`
    pub fn relative_storage_path(&self) -> Result<PathBuf> {
        let channel = self.require_channel()?;
        Ok(Path::new(STORE_DIR)
            .join(channel)
            .join(format!("{}.{}", self.id, AUDIO_EXT)))
    }

    /// Absolute store path under a library root
    pub fn storage_path(&self, root: &Path) -> Result<PathBuf> {
        Ok(root.join(self.relative_storage_path()?))
    }

    /// File name used for browsable links
    pub fn link_file_name(&self) -> String {
        format!("{}.{}", self.title, AUDIO_EXT)
    }

    /// Watch URL on the platform
    pub fn watch_url(&self) -> String {
        format!("https://youtu.be/{}", self.id)
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} {}", self.artist, self.title, self.watch_url())?;
        if let Some(channel) = &self.channel_id {
            write!(f, " from https://www.youtube.com/channel/{}", channel)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, artist: &str, title: &str) -> RawTrack {
        RawTrack {
            id: id.to_string(),
            channel_id: Some("UC123".to_string()),
            title: title.to_string(),
            artist: artist.to_string(),
            album: None,
            duration: 200,
        }
    }

    #[test]
    fn test_sanitizes_path_separators() {
        let mut r = raw("abc", "AC/DC", "Back/In/Black");
        r.album = Some("High/Voltage".to_string());
        let track = Track::new(r).unwrap();

        assert_eq!(track.artist, "AC_DC");
        assert_eq!(track.title, "Back_In_Black");
        assert_eq!(track.album.as_deref(), Some("High_Voltage"));
    }

    #[test]
    fn test_sanitize_neutralizes_dot_segments() {
        assert_eq!(sanitize_segment(".."), "_.");
        assert_eq!(sanitize_segment("."), "_");
        assert_eq!(sanitize_segment(""), "_");
        assert_eq!(sanitize_segment("../.."), ".._..");
        assert_eq!(sanitize_segment("...And Justice"), "...And Justice");

        let track = Track::new(raw("abc", "..", ".")).unwrap();
        assert_eq!(track.artist, "_.");
        assert_eq!(track.title, "_");
    }

    #[test]
    fn test_rejects_invalid_records() {
        assert!(matches!(
            Track::new(raw("", "a", "t")),
            Err(Error::InvalidTrackData(_))
        ));
        assert!(matches!(
            Track::new(raw("id", "", "t")),
            Err(Error::InvalidTrackData(_))
        ));
        assert!(matches!(
            Track::new(raw("id", "a", "  ")),
            Err(Error::InvalidTrackData(_))
        ));

        assert!(matches!(
            Track::new(raw("..", "a", "t")),
            Err(Error::InvalidTrackData(_))
        ));
        let mut escaping = raw("id", "a", "t");
        escaping.channel_id = Some("../UC1".to_string());
        assert!(matches!(
            Track::new(escaping),
            Err(Error::InvalidTrackData(_))
        ));

        let mut negative = raw("id", "a", "t");
        negative.duration = -1;
        assert!(matches!(
            Track::new(negative),
            Err(Error::InvalidTrackData(_))
        ));
    }

    #[test]
    fn test_storage_path_depends_only_on_channel_and_id() {
        let a = Track::new(raw("vid1", "Artist", "One")).unwrap();
        let b = Track::new(raw("vid1", "Other", "Two")).unwrap();
        let root = Path::new("/music");

        assert_eq!(
            a.storage_path(root).unwrap(),
            PathBuf::from("/music/.ytm/UC123/vid1.ogg")
        );
        assert_eq!(a.storage_path(root).unwrap(), b.storage_path(root).unwrap());
    }

    #[test]
    fn test_storage_path_requires_channel() {
        let mut r = raw("vid1", "Artist", "One");
        r.channel_id = None;
        let track = Track::new(r).unwrap();
        assert!(matches!(
            track.storage_path(Path::new("/music")),
            Err(Error::InvalidTrackData(_))
        ));
    }

    #[test]
    fn test_empty_album_is_unsorted() {
        let mut r = raw("vid1", "Artist", "One");
        r.album = Some(String::new());
        assert_eq!(Track::new(r).unwrap().album, None);
    }
}
