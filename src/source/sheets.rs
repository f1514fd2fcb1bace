//! Google Sheets source.
//!
//! Reads one worksheet through the Sheets API v4 `values` endpoint. Access is
//! granted to a service account: a signed RS256 assertion is exchanged for a
//! short-lived bearer token on every fetch.
//!
//! The worksheet's first row is a header naming the `content_id`, `title`,
//! `type` and `file_path` columns, in any order.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use media_viewer_common::{ContentId, MediaMap, MediaRecord};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{http_client, scalar_text, MetadataSource, SourceError};
use crate::config::{SourceConfig, PLACEHOLDER_SPREADSHEET_ID};

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

const REQUIRED_COLUMNS: [&str; 4] = ["content_id", "title", "type", "file_path"];

/// The fields of a service-account key file that signing needs.
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetsSource {
    client: Client,
    spreadsheet_id: Option<String>,
    worksheet: String,
    credentials_path: Option<PathBuf>,
    api_base: String,
}

impl SheetsSource {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        credentials_path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(timeout)?,
            spreadsheet_id: Some(spreadsheet_id.into()),
            worksheet: worksheet.into(),
            credentials_path: Some(credentials_path.into()),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    pub fn from_config(config: &SourceConfig, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(timeout)?,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
            credentials_path: config.credentials_path.clone(),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    /// Point the source at a different Sheets API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn spreadsheet_id(&self) -> Result<&str, SourceError> {
        match self.spreadsheet_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() && id != PLACEHOLDER_SPREADSHEET_ID => Ok(id),
            _ => Err(SourceError::Config("spreadsheet_id is not set".to_string())),
        }
    }

    async fn load_key(&self) -> Result<ServiceAccountKey, SourceError> {
        let path = self
            .credentials_path
            .as_ref()
            .ok_or_else(|| SourceError::Config("credentials_path is not set".to_string()))?;

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.display().to_string(),
                source,
            })?;

        serde_json::from_str(&raw).map_err(|e| {
            SourceError::Config(format!(
                "invalid service account credentials in {}: {}",
                path.display(),
                e
            ))
        })
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String, SourceError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: SHEETS_READONLY_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SourceError::Auth(format!("unusable private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| SourceError::Auth(format!("failed to sign assertion: {}", e)))?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Auth(format!("invalid token response: {}", e)))?;

        Ok(token.access_token)
    }

    fn values_url(&self, spreadsheet_id: &str) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SourceError::Config(format!("invalid api_base: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| SourceError::Config("api_base cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", self.worksheet.as_str()]);

        Ok(url)
    }
}

#[async_trait]
impl MetadataSource for SheetsSource {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn fetch(&self) -> Result<MediaMap, SourceError> {
        let spreadsheet_id = self.spreadsheet_id()?;
        let url = self.values_url(spreadsheet_id)?;
        let key = self.load_key().await?;
        let token = self.access_token(&key).await?;

        tracing::debug!(
            "Reading worksheet {:?} of spreadsheet {}",
            self.worksheet,
            spreadsheet_id
        );
        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::Auth(format!(
                "Sheets API refused access ({})",
                status
            )));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let range: ValueRange =
            serde_json::from_str(&body).map_err(|e| SourceError::Malformed(e.to_string()))?;

        rows_to_mapping(&range.values)
    }
}

/// Build a mapping from worksheet rows, the first being the header.
fn rows_to_mapping(rows: &[Vec<Value>]) -> Result<MediaMap, SourceError> {
    let Some((header, rows)) = rows.split_first() else {
        return Err(SourceError::Shape("worksheet is empty".to_string()));
    };

    let header: Vec<String> = header
        .iter()
        .map(|cell| cell_text(Some(cell)).trim().to_lowercase())
        .collect();

    let mut columns = [0usize; 4];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SourceError::Shape(format!("missing column {:?}", name)))?;
    }
    let [id_col, title_col, type_col, path_col] = columns;

    let mut map = MediaMap::with_capacity(rows.len());
    for row in rows {
        let id = cell_text(row.get(id_col));
        if id.trim().is_empty() {
            continue;
        }
        let Ok(id) = ContentId::new(id) else {
            continue;
        };

        let record = MediaRecord::new(
            cell_text(row.get(title_col)),
            cell_text(row.get(type_col)),
            cell_text(row.get(path_col)),
        );
        map.insert(id, record);
    }

    Ok(map)
}

fn cell_text(cell: Option<&Value>) -> String {
    scalar_text(cell).unwrap_or_else(|| cell.map(Value::to_string).unwrap_or_default())
}
