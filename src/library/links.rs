//! Filesystem helpers for association files and relative symlinks.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::error::Result;

/// What happened when ensuring an association file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// File did not exist and was written
    Created,

    /// File already held the same value
    Unchanged,

    /// File holds a different value, which was kept
    Conflict { existing: String },
}

/// Write `value` to `path` unless the file already exists (first writer wins)
pub async fn ensure_association(path: &Path, value: &str) -> Result<Association> {
    match fs::read_to_string(path).await {
        Ok(existing) if existing.trim() == value => Ok(Association::Unchanged),
        Ok(existing) => {
            let existing = existing.trim().to_string();
            warn!(
                path = %path.display(),
                %existing,
                new = value,
                "Association file already points elsewhere, keeping existing value"
            );
            Ok(Association::Conflict { existing })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, value).await?;
            Ok(Association::Created)
        }
        Err(e) => Err(e.into()),
    }
}

/// Write `value` to `path`, replacing any previous content
pub async fn write_marker(path: &Path, value: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, value).await?;
    Ok(())
}

/// Path from directory `from_dir` to `to`, using `..` for the divergent part
///
/// Both paths must share the same base (both absolute, or both relative to
/// the same directory); the computation is purely lexical.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from_dir
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let target: Vec<Component> = to
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = from
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Point `link` at `target` with a relative symlink, replacing whatever was there
///
/// Remove-then-create: a concurrent reader may briefly see no entry.
pub async fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    let parent = link.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).await?;

    match fs::remove_file(link).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let relative = relative_path(parent, target);
    create_symlink(&relative, link).await?;
    Ok(())
}

#[cfg(unix)]
async fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink(target, link).await
}

#[cfg(windows)]
async fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink_file(target, link).await
}
