//! yt-dlp adapter for listings and audio downloads.
//!
//! Uses subprocess mode, calling the `yt-dlp` CLI directly and parsing its
//! `--dump-single-json` output.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::process::Command;

use super::{Extractor, Listing, ListingEntry};
use crate::domain::AUDIO_EXT;

/// Stem of the file yt-dlp writes into the download directory
const OUTPUT_STEM: &str = "track";

/// yt-dlp adapter using subprocess mode
pub struct YtDlpAdapter {
    /// Path to the yt-dlp binary (default: "yt-dlp")
    binary_path: String,
}

impl Default for YtDlpAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpAdapter {
    /// Create an adapter that finds `yt-dlp` on PATH
    pub fn new() -> Self {
        Self::with_binary_path("yt-dlp")
    }

    /// Create an adapter with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    pub fn binary_path(&self) -> &str {
        &self.binary_path
    }

    /// Arguments for a metadata-only dump of `url`
    fn metadata_args(url: &str, flat: bool) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
        ];
        if flat {
            args.push("--flat-playlist".to_string());
        } else {
            args.push("--no-playlist".to_string());
        }
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Arguments for an audio download into `output_dir`
    fn download_args(video_id: &str, output_dir: &Path) -> Vec<String> {
        let template = output_dir.join(format!("{}.%(ext)s", OUTPUT_STEM));
        vec![
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "vorbis".to_string(),
            "--add-metadata".to_string(),
            "--restrict-filenames".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--output".to_string(),
            template.to_string_lossy().to_string(),
            "--".to_string(),
            video_id.to_string(),
        ]
    }

    /// Run yt-dlp and parse stdout as JSON
    async fn run_json<T: DeserializeOwned>(&self, args: &[String]) -> Result<T> {
        let output = Command::new(&self.binary_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.binary_path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "yt-dlp failed with exit code {}: {}",
                exit_code,
                stderr.trim()
            );
        }

        serde_json::from_slice(&output.stdout).context("Failed to parse yt-dlp JSON output")
    }
}

#[async_trait]
impl Extractor for YtDlpAdapter {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract_flat(&self, url: &str) -> Result<Listing> {
        tracing::debug!(url, "Listing via yt-dlp");
        self.run_json(&Self::metadata_args(url, true)).await
    }

    async fn extract_video(&self, url: &str) -> Result<ListingEntry> {
        tracing::debug!(url, "Fetching video metadata via yt-dlp");
        self.run_json(&Self::metadata_args(url, false)).await
    }

    async fn download_audio(&self, video_id: &str, output_dir: &Path) -> Result<PathBuf> {
        let output = Command::new(&self.binary_path)
            .args(Self::download_args(video_id, output_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.binary_path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp download failed for {}: {}", video_id, stderr.trim());
        }

        let produced = output_dir.join(format!("{}.{}", OUTPUT_STEM, AUDIO_EXT));
        anyhow::ensure!(
            produced.exists(),
            "yt-dlp completed but output file not found at {}",
            produced.display()
        );

        Ok(produced)
    }

    async fn health_check(&self) -> Result<()> {
        let output = Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .await
            .context("Failed to run yt-dlp health check")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp health check failed: {}", stderr);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_binary_path() {
        let adapter = YtDlpAdapter::with_binary_path("/opt/bin/yt-dlp");
        assert_eq!(adapter.binary_path(), "/opt/bin/yt-dlp");
        assert_eq!(adapter.name(), "yt-dlp");
    }

    #[test]
    fn test_flat_listing_args() {
        let args = YtDlpAdapter::metadata_args("https://example.com/list", true);
        assert!(args.contains(&"--flat-playlist".to_string()));
        assert_eq!(args.last().unwrap(), "https://example.com/list");
    }

    #[test]
    fn test_download_args_request_vorbis() {
        let args = YtDlpAdapter::download_args("-abc", Path::new("/tmp/work"));
        let joined = args.join(" ");

        assert!(joined.contains("--format bestaudio/best"));
        assert!(joined.contains("--audio-format vorbis"));
        assert!(joined.contains("--add-metadata"));
        assert!(joined.contains("/tmp/work/track.%(ext)s"));
        // Ids starting with a dash must not be parsed as options
        assert_eq!(&args[args.len() - 2..], ["--", "-abc"]);
    }

    #[test]
    fn test_listing_deserializes_flat_output() {
        let json = r#"{
            "id": "UC1",
            "title": "Artist - Videos",
            "channel": "Artist",
            "channel_id": "UC1",
            "entries": [
                {"id": "v1", "title": "Song", "duration": 201.0, "channel_id": null},
                {"id": "v2", "title": "Clip"}
            ]
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        let entries = listing.entries.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].duration, Some(201.0));
        assert_eq!(entries[0].channel_id, None);
        assert_eq!(entries[1].duration, None);
    }

    #[tokio::test]
    async fn test_missing_binary_fails() {
        let adapter = YtDlpAdapter::with_binary_path("/nonexistent/yt-dlp-binary");
        assert!(adapter.health_check().await.is_err());
        assert!(adapter.extract_flat("https://example.com").await.is_err());
    }
}
