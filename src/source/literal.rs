//! In-process catalog.

use async_trait::async_trait;
use media_viewer_common::{ContentId, MediaKind, MediaMap, MediaRecord};

use super::{MetadataSource, SourceError};

/// Serves a fixed mapping; every fetch returns the same entries.
pub struct LiteralSource {
    entries: MediaMap,
}

impl LiteralSource {
    pub fn new(entries: MediaMap) -> Self {
        Self { entries }
    }

    /// The demo catalog shipped with the viewer.
    pub fn demo() -> Self {
        let demo = [
            ("image001", "Sunset Over the Ocean", MediaKind::Image, "images/your_image_1.jpg"),
            ("image002", "Mountain View", MediaKind::Image, "images/your_image_2.png"),
            ("video001", "Forest Stream", MediaKind::Video, "videos/your_video_1.mp4"),
            ("video002", "City Lights", MediaKind::Video, "videos/your_video_2.webm"),
        ];

        let entries = demo
            .into_iter()
            .filter_map(|(id, title, kind, path)| {
                ContentId::new(id)
                    .ok()
                    .map(|id| (id, MediaRecord::new(title, kind, path)))
            })
            .collect();

        Self { entries }
    }
}

#[async_trait]
impl MetadataSource for LiteralSource {
    fn name(&self) -> &'static str {
        "literal"
    }

    async fn fetch(&self) -> Result<MediaMap, SourceError> {
        Ok(self.entries.clone())
    }
}
