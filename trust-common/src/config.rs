//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default demo unlock price in stars
pub const DEFAULT_DEMO_PRICE_STARS: i64 = 100;

/// Default entry price in stars (reserved, gate not active yet)
pub const DEFAULT_ENTRY_PRICE_STARS: i64 = 250;

/// Default trust chart fetch limit
pub const DEFAULT_CHART_LIMIT: i64 = 200;

/// Validity window for minted media access URLs, in seconds
pub const MEDIA_URL_TTL_SECS: i64 = 600;

/// Service configuration
///
/// Loaded from an optional `trust.toml` inside the data folder, with
/// compiled defaults for anything missing.
#[derive(Debug, Clone)]
pub struct TrustConfig {
    /// Folder holding the database, media files and optional config file
    pub data_folder: PathBuf,
    /// Demo unlock price shown and recorded on purchases
    pub demo_price_stars: i64,
    /// Entry price (reserved for the future entry_active gate)
    pub entry_price_stars: i64,
    /// Maximum artists fetched for the trust chart
    pub chart_limit: i64,
    /// Folder holding demo track files, keyed by `tracks.storage_path`
    pub media_folder: PathBuf,
}

/// Subset of fields accepted from `trust.toml`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    demo_price_stars: Option<i64>,
    entry_price_stars: Option<i64>,
    chart_limit: Option<i64>,
    media_folder: Option<PathBuf>,
}

impl TrustConfig {
    /// Load configuration rooted at the given data folder.
    ///
    /// A missing `trust.toml` is not an error; a malformed one is.
    pub fn load(data_folder: &Path) -> Result<Self> {
        let file = read_config_file(&data_folder.join("trust.toml"))?;

        Ok(TrustConfig {
            data_folder: data_folder.to_path_buf(),
            demo_price_stars: file.demo_price_stars.unwrap_or(DEFAULT_DEMO_PRICE_STARS),
            entry_price_stars: file.entry_price_stars.unwrap_or(DEFAULT_ENTRY_PRICE_STARS),
            chart_limit: file.chart_limit.unwrap_or(DEFAULT_CHART_LIMIT),
            media_folder: file
                .media_folder
                .unwrap_or_else(|| data_folder.join("media")),
        })
    }

    /// Path of the SQLite database inside the data folder.
    pub fn database_path(&self) -> PathBuf {
        self.data_folder.join("trust.db")
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `TRUST_DATA_FOLDER` environment variable
/// 3. `data_folder` key in the platform config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var("TRUST_DATA_FOLDER") {
        return PathBuf::from(path);
    }

    if let Some(config_path) = platform_config_file() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(value) = toml::from_str::<toml::Value>(&content) {
                if let Some(folder) = value.get("data_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(folder);
                }
            }
        }
    }

    default_data_folder()
}

/// Platform config file location (`~/.config/trust/config.toml` or equivalent)
fn platform_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("trust").join("config.toml");
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("trust"))
        .unwrap_or_else(|| PathBuf::from("./trust_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrustConfig::load(dir.path()).unwrap();

        assert_eq!(config.demo_price_stars, DEFAULT_DEMO_PRICE_STARS);
        assert_eq!(config.entry_price_stars, DEFAULT_ENTRY_PRICE_STARS);
        assert_eq!(config.chart_limit, DEFAULT_CHART_LIMIT);
        assert_eq!(config.media_folder, dir.path().join("media"));
        assert_eq!(config.database_path(), dir.path().join("trust.db"));
    }

    #[test]
    fn test_config_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("trust.toml"),
            "demo_price_stars = 150\nchart_limit = 50\n",
        )
        .unwrap();

        let config = TrustConfig::load(dir.path()).unwrap();
        assert_eq!(config.demo_price_stars, 150);
        assert_eq!(config.chart_limit, 50);
        // Untouched keys keep defaults
        assert_eq!(config.entry_price_stars, DEFAULT_ENTRY_PRICE_STARS);
    }

    #[test]
    fn test_malformed_config_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("trust.toml"), "demo_price_stars = [[").unwrap();

        let result = TrustConfig::load(dir.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_argument_wins() {
        let folder = resolve_data_folder(Some(Path::new("/tmp/trust-cli")));
        assert_eq!(folder, PathBuf::from("/tmp/trust-cli"));
    }
}
