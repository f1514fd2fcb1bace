mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding `source.url`.
pub const ENV_SOURCE_URL: &str = "MEDIA_SOURCE_URL";

/// Environment variable overriding `media.root`.
pub const ENV_MEDIA_ROOT: &str = "MEDIA_ROOT";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./media-viewer.toml",
        "~/.config/media-viewer/config.toml",
        "/etc/media-viewer/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Apply `MEDIA_SOURCE_URL` and `MEDIA_ROOT` on top of file values.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = std::env::var(ENV_SOURCE_URL) {
        if !url.trim().is_empty() {
            config.source.url = Some(url);
        }
    }

    if let Ok(root) = std::env::var(ENV_MEDIA_ROOT) {
        if !root.trim().is_empty() {
            config.media.root = PathBuf::from(root);
        }
    }
}

/// Validate configuration.
///
/// Missing source settings are only warned about: the refresh itself reports
/// them and leaves the catalog empty.
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.source.timeout_secs == 0 {
        anyhow::bail!("Source timeout cannot be 0");
    }

    if !config.media.root.exists() {
        tracing::warn!("Media root does not exist: {:?}", config.media.root);
    }

    match config.source.kind {
        SourceKind::Literal => {}
        SourceKind::AppsScript => {
            if config.source.url_or_placeholder() == PLACEHOLDER_SOURCE_URL {
                tracing::warn!(
                    "No Apps Script URL configured; set source.url or {}",
                    ENV_SOURCE_URL
                );
            }
        }
        SourceKind::Sheets => {
            if config.source.spreadsheet_id.is_none() {
                tracing::warn!("Sheets source has no spreadsheet_id");
            }
            if config.source.credentials_path.is_none() {
                tracing::warn!("Sheets source has no credentials_path");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_viewer_common::MediaKind;
    use serial_test::serial;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.source.kind, SourceKind::Literal);
        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.source.refresh_interval_secs, 0);
        assert_eq!(config.source.worksheet, "Sheet1");
        assert_eq!(config.source.url_or_placeholder(), PLACEHOLDER_SOURCE_URL);
    }

    #[test]
    #[serial]
    fn test_load_apps_script_config() {
        std::env::remove_var(ENV_SOURCE_URL);
        let (_dir, path) = write_config(
            r#"
[server]
port = 8081

[source]
kind = "apps_script"
url = "https://script.example.com/exec"
timeout_secs = 3
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.source.kind, SourceKind::AppsScript);
        assert_eq!(config.source.timeout_secs, 3);
        assert_eq!(
            config.source.url_or_placeholder(),
            "https://script.example.com/exec"
        );
    }

    #[test]
    #[serial]
    fn test_inline_entries() {
        let (_dir, path) = write_config(
            r#"
[source]
kind = "literal"

[source.entries.poster01]
title = "Poster"
type = "image"
file_path = "images/poster.png"
"#,
        );

        let config = load_config(&path).unwrap();
        let entries = config.source.entries.unwrap();
        let record = entries.get("poster01").unwrap();
        assert_eq!(record.title, "Poster");
        assert_eq!(record.kind, MediaKind::Image);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let (_dir, path) = write_config(
            r#"
[media]
root = "/mnt/usb"

[source]
kind = "apps_script"
url = "https://from-file.example.com"
"#,
        );

        std::env::set_var(ENV_SOURCE_URL, "https://from-env.example.com");
        std::env::set_var(ENV_MEDIA_ROOT, "/mnt/other");
        let config = load_config(&path);
        std::env::remove_var(ENV_SOURCE_URL);
        std::env::remove_var(ENV_MEDIA_ROOT);

        let config = config.unwrap();
        assert_eq!(config.source.url_or_placeholder(), "https://from-env.example.com");
        assert_eq!(config.media.root, PathBuf::from("/mnt/other"));
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        let (_dir, path) = write_config("[server]\nport = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_zero_timeout_rejected() {
        let (_dir, path) = write_config("[source]\ntimeout_secs = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_unknown_kind_rejected() {
        let (_dir, path) = write_config("[source]\nkind = \"ftp\"\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_missing_sheets_settings_only_warn() {
        let (_dir, path) = write_config("[source]\nkind = \"sheets\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.source.kind, SourceKind::Sheets);
        assert!(config.source.spreadsheet_id.is_none());
    }
}
