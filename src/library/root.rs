//! Library root discovery and initialisation.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::domain::STORE_DIR;
use crate::error::{Error, Result};

/// Walk up from `start` to the first directory containing a `.ytm` directory
pub fn find_library_root(start: &Path) -> Result<PathBuf> {
    for dir in start.ancestors() {
        if dir.join(STORE_DIR).is_dir() {
            info!("found {} directory at {}", STORE_DIR, dir.display());
            return Ok(dir.to_path_buf());
        }
    }
    Err(Error::RootNotFound(start.to_path_buf()))
}

/// Create `path` and its `.ytm` marker; safe to repeat
pub async fn init_library(path: &Path) -> Result<PathBuf> {
    let marker = path.join(STORE_DIR);
    fs::create_dir_all(&marker).await?;
    Ok(marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("music");

        init_library(&lib).await.unwrap();
        init_library(&lib).await.unwrap();

        assert!(lib.join(".ytm").is_dir());
        assert_eq!(find_library_root(&lib).unwrap(), lib);
    }

    #[test]
    fn test_marker_file_is_not_a_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".ytm"), b"").unwrap();
        assert!(matches!(
            find_library_root(temp.path()),
            Err(Error::RootNotFound(_))
        ));
    }
}
