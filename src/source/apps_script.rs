//! Apps Script web app source.
//!
//! The deployed script answers a plain GET with the whole catalog as one JSON
//! object keyed by content id, so a fetch is a single bounded request.

use std::time::Duration;

use async_trait::async_trait;
use media_viewer_common::MediaMap;
use reqwest::{Client, Url};

use super::{http_client, parse_mapping, MetadataSource, SourceError};
use crate::config::PLACEHOLDER_SOURCE_URL;

pub struct AppsScriptSource {
    client: Client,
    url: String,
}

impl AppsScriptSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
        })
    }

    fn endpoint(&self) -> Result<Url, SourceError> {
        let url = self.url.trim();
        if url.is_empty() || url == PLACEHOLDER_SOURCE_URL {
            return Err(SourceError::Config(
                "Apps Script URL is not set".to_string(),
            ));
        }

        Url::parse(url).map_err(|e| SourceError::Config(format!("invalid URL {:?}: {}", url, e)))
    }
}

#[async_trait]
impl MetadataSource for AppsScriptSource {
    fn name(&self) -> &'static str {
        "apps_script"
    }

    async fn fetch(&self) -> Result<MediaMap, SourceError> {
        let url = self.endpoint()?;

        tracing::debug!("Fetching media data from {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SourceError::Malformed(e.to_string()))?;

        parse_mapping(value)
    }
}
