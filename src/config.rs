//! Configuration for a managed library.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (YTM_YTDLP_BIN)
//! 2. Library config file (<root>/.ytm/config.yaml)
//! 3. User config file (~/.config/yt-manager/config.yaml)
//! 4. Defaults
//!
//! Configuration is resolved per library root and passed explicitly.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::aggregator::FilterRules;
use crate::domain::STORE_DIR;
use crate::error::{Error, Result};

/// Environment variable overriding the yt-dlp binary
pub const YTDLP_BIN_ENV: &str = "YTM_YTDLP_BIN";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub filters: Option<FilterRules>,
    #[serde(default)]
    pub ytdlp: Option<YtDlpConfig>,
    #[serde(default)]
    pub ytmusic: Option<YtMusicConfig>,
}

fn default_version() -> String {
    "1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpConfig {
    pub binary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtMusicConfig {
    /// Query YouTube Music for curated releases (default: true)
    pub enabled: Option<bool>,
}

/// Resolved configuration for one library
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Library root (directory containing `.ytm`)
    pub root: PathBuf,
    /// Path to the config file used (if any)
    pub config_file: Option<PathBuf>,
    /// Track exclusion rules
    pub filters: FilterRules,
    /// yt-dlp binary to invoke
    pub ytdlp_binary: String,
    /// Whether curated releases are looked up
    pub ytmusic_enabled: bool,
}

impl ResolvedConfig {
    /// Defaults for a library without any config file
    pub fn defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_file: None,
            filters: FilterRules::default(),
            ytdlp_binary: "yt-dlp".to_string(),
            ytmusic_enabled: true,
        }
    }
}

/// `<root>/.ytm/config.yaml`
pub fn library_config_path(root: &Path) -> PathBuf {
    root.join(STORE_DIR).join("config.yaml")
}

/// `~/.config/yt-manager/config.yaml` (platform config dir)
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("yt-manager").join("config.yaml"))
}

/// Load and parse a config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        reason: format!("failed to read: {}", e),
    })?;

    serde_yaml::from_str(&content).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        reason: format!("failed to parse: {}", e),
    })
}

/// Merge an optional config file and environment override onto the defaults
pub fn resolve(
    root: &Path,
    file: Option<(PathBuf, ConfigFile)>,
    ytdlp_env: Option<String>,
) -> ResolvedConfig {
    let mut config = ResolvedConfig::defaults(root);

    if let Some((path, file)) = file {
        if let Some(filters) = file.filters {
            config.filters = filters;
        }
        if let Some(binary) = file.ytdlp.and_then(|y| y.binary) {
            config.ytdlp_binary = binary;
        }
        if let Some(enabled) = file.ytmusic.and_then(|y| y.enabled) {
            config.ytmusic_enabled = enabled;
        }
        config.config_file = Some(path);
    }

    if let Some(binary) = ytdlp_env.filter(|b| !b.is_empty()) {
        config.ytdlp_binary = binary;
    }

    config
}

/// Load configuration for the library at `root` from all sources
pub fn load(root: &Path) -> Result<ResolvedConfig> {
    let candidates = std::iter::once(library_config_path(root)).chain(user_config_path());

    let mut file = None;
    for path in candidates {
        if path.exists() {
            let parsed = load_config_file(&path)?;
            file = Some((path, parsed));
            break;
        }
    }

    Ok(resolve(root, file, std::env::var(YTDLP_BIN_ENV).ok()))
}
