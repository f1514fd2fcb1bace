//! Media-Viewer-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across media-viewer:
//!
//! - **Content IDs**: The opaque string key that names one media item
//! - **Core Types**: [`MediaRecord`] and its [`MediaKind`]
//! - **Path Utilities**: Root containment for served files
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use media_viewer_common::{ContentId, MediaKind, MediaRecord};
//!
//! let id = ContentId::new("image001").unwrap();
//! let record = MediaRecord::new("Sunset Over the Ocean", MediaKind::Image, "images/sunset.jpg");
//!
//! assert_eq!(id.as_str(), "image001");
//! assert!(record.kind.is_image());
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
