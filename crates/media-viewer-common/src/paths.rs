//! Path utilities for serving files from a configured root.
//!
//! Request paths come straight from URLs, so every lookup goes through
//! [`resolve_within`], which refuses anything that would land outside the root
//! either lexically (`..`, absolute paths) or through a symlink.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Validate a request path lexically and return it as a relative [`PathBuf`].
///
/// Only plain path segments are accepted; `.` segments are dropped.
///
/// # Examples
///
/// ```
/// use media_viewer_common::paths::sanitize_relative;
///
/// assert!(sanitize_relative("videos/clip.mp4").is_ok());
/// assert!(sanitize_relative("../secret.txt").is_err());
/// assert!(sanitize_relative("/etc/passwd").is_err());
/// ```
pub fn sanitize_relative(requested: &str) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(requested).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::path_escape(requested));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(Error::invalid_input("empty file path"));
    }

    Ok(clean)
}

/// Resolve `requested` against `root`, returning the canonical path of an
/// existing regular file inside `root`.
///
/// Missing files and directories are reported as [`Error::NotFound`];
/// anything resolving outside the root as [`Error::PathEscape`].
pub fn resolve_within(root: &Path, requested: &str) -> Result<PathBuf> {
    let relative = sanitize_relative(requested)?;

    let root = root
        .canonicalize()
        .map_err(|_| Error::not_found(format!("media root {}", root.display())))?;

    let candidate = match root.join(&relative).canonicalize() {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::not_found(requested));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    if !candidate.starts_with(&root) {
        return Err(Error::path_escape(requested));
    }

    if !candidate.is_file() {
        return Err(Error::not_found(requested));
    }

    Ok(candidate)
}
