//! Core type definitions for media records.
//!
//! The wire shape of a record is fixed by the browser client and by the
//! external metadata sources: `{"title": .., "type": .., "file_path": ..}`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::ids::ContentId;

/// A complete metadata mapping as produced by a source.
pub type MediaMap = HashMap<ContentId, MediaRecord>;

/// Kind of media a record points at.
///
/// Sources are free text, so anything other than `image` or `video` is kept
/// verbatim in [`MediaKind::Other`] and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaKind {
    /// A still image.
    Image,
    /// A video clip.
    Video,
    /// Any other label supplied by the source.
    Other(String),
}

impl MediaKind {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image)
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for MediaKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "image" => Self::Image,
            "video" => Self::Video,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for MediaKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<MediaKind> for String {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Display title.
    pub title: String,
    /// Media kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Path relative to the media root, or an absolute `http(s)` URL.
    pub file_path: String,
}

impl MediaRecord {
    pub fn new(
        title: impl Into<String>,
        kind: impl Into<MediaKind>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            file_path: file_path.into(),
        }
    }

    /// Whether `file_path` points at a remote URL instead of the local root.
    pub fn is_remote(&self) -> bool {
        self.file_path.starts_with("http://") || self.file_path.starts_with("https://")
    }
}
