use media_viewer_common::MediaMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fallback Apps Script URL used when neither the config file nor
/// `MEDIA_SOURCE_URL` provides one. Refreshing against it always fails.
pub const PLACEHOLDER_SOURCE_URL: &str = "YOUR_APPS_SCRIPT_WEB_APP_URL";

/// Placeholder spreadsheet id shipped in sample configs.
pub const PLACEHOLDER_SPREADSHEET_ID: &str = "YOUR_SPREADSHEET_ID";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where media files are served from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Root for `/local_media/*`, typically a mounted drive.
    #[serde(default = "default_media_root")]
    pub root: PathBuf,

    /// Root for `/static/*`, the folder bundled with the app.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("/media/socialmedium/MediaServer")
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Built-in or inline catalog.
    #[default]
    Literal,
    /// Deployed Apps Script web app returning the whole mapping as JSON.
    AppsScript,
    /// Google Sheets API read with a service account.
    Sheets,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::AppsScript => "apps_script",
            Self::Sheets => "sheets",
        }
    }
}

/// Metadata source settings. Only the fields relevant to `kind` are read.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Upper bound for each outbound request, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Background refresh period in seconds; 0 disables it.
    #[serde(default)]
    pub refresh_interval_secs: u64,

    /// Apps Script web app URL (overridden by `MEDIA_SOURCE_URL`).
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    #[serde(default = "default_worksheet")]
    pub worksheet: String,

    /// Service-account credentials JSON.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    /// Sheets API base URL, without the `/v4` suffix.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Inline catalog for the literal source; the demo catalog is used when unset.
    #[serde(default)]
    pub entries: Option<MediaMap>,
}

fn default_timeout() -> u64 {
    10
}
fn default_worksheet() -> String {
    "Sheet1".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            timeout_secs: default_timeout(),
            refresh_interval_secs: 0,
            url: None,
            spreadsheet_id: None,
            worksheet: default_worksheet(),
            credentials_path: None,
            api_base: None,
            entries: None,
        }
    }
}

impl SourceConfig {
    /// The Apps Script URL to fetch, falling back to the placeholder.
    pub fn url_or_placeholder(&self) -> &str {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(PLACEHOLDER_SOURCE_URL)
    }
}
