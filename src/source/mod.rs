//! Metadata sources.
//!
//! A [`MetadataSource`] produces the complete content-id → record mapping in
//! one call. The catalog never looks inside a source; swapping the literal
//! demo catalog for a spreadsheet is purely a configuration change.
//!
//! # Module layout
//!
//! - [`literal`] -- Built-in demo catalog or entries inlined in the config.
//! - [`apps_script`] -- JSON object served by a deployed Apps Script web app.
//! - [`sheets`] -- Google Sheets API read authenticated with a service account.

pub mod apps_script;
pub mod literal;
pub mod sheets;

pub use apps_script::AppsScriptSource;
pub use literal::LiteralSource;
pub use sheets::SheetsSource;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use media_viewer_common::{ContentId, MediaMap, MediaRecord};
use reqwest::Client;
use serde_json::Value;

use crate::config::{SourceConfig, SourceKind};

/// Why a fetch from a source failed.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Missing or placeholder settings; no request was made.
    #[error("source is not configured: {0}")]
    Config(String),

    /// Connection, TLS, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The source answered with a non-success HTTP status.
    #[error("source returned HTTP {status}")]
    Status { status: u16 },

    /// The body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The body decoded but is not a content-id mapping.
    #[error("unexpected response shape: {0}")]
    Shape(String),

    /// Credentials were rejected or could not be used.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A local file the source depends on could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Async trait implemented by every metadata backend.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Short, lowercase identifier for this source (e.g. `"sheets"`).
    fn name(&self) -> &'static str;

    /// Fetch the complete current mapping.
    async fn fetch(&self) -> Result<MediaMap, SourceError>;
}

/// Create the source selected by `config.kind`.
///
/// Fails only if the HTTP client for a remote source cannot be built.
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn MetadataSource>, SourceError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let source: Arc<dyn MetadataSource> = match config.kind {
        SourceKind::Literal => match &config.entries {
            Some(entries) => Arc::new(LiteralSource::new(entries.clone())),
            None => Arc::new(LiteralSource::demo()),
        },
        SourceKind::AppsScript => Arc::new(AppsScriptSource::new(
            config.url_or_placeholder(),
            timeout,
        )?),
        SourceKind::Sheets => Arc::new(SheetsSource::from_config(config, timeout)?),
    };
    Ok(source)
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, SourceError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Text form of a scalar JSON value.
///
/// Missing and null values read as empty; arrays and objects have no text form.
pub(crate) fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => None,
    }
}

fn record_from_value(value: &Value) -> Option<MediaRecord> {
    let fields = value.as_object()?;
    Some(MediaRecord::new(
        scalar_text(fields.get("title"))?,
        scalar_text(fields.get("type"))?,
        scalar_text(fields.get("file_path"))?,
    ))
}

/// Interpret a JSON document as a content-id mapping.
///
/// The top level must be an object. Scalar field values are read as text the
/// same way spreadsheet cells are, so a numeric title still loads. Entries
/// that are not records (or have an empty key) are skipped with a warning.
pub fn parse_mapping(value: Value) -> Result<MediaMap, SourceError> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(SourceError::Shape(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut map = MediaMap::with_capacity(object.len());
    for (key, entry) in object {
        let Ok(id) = ContentId::new(key) else {
            tracing::warn!("Skipping media entry with an empty content id");
            continue;
        };
        match record_from_value(&entry) {
            Some(record) => {
                map.insert(id, record);
            }
            None => tracing::warn!(
                "Skipping media entry {:?}: expected a record, got {}",
                id.as_str(),
                json_type_name(&entry)
            ),
        }
    }

    Ok(map)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
