use crate::checksum::Sha256Digest;
use crate::dependency::{default_cache_root, AssetDescriptor, FetcherSettings};
use crate::release;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// A pinned asset (optional `[[assets]]` entries in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// File name inside `static/`, e.g. `dev.js`.
    pub file_name: String,
    /// Expected SHA-256 as 64 hex characters (either case).
    pub sha256: String,
}

impl AssetConfig {
    pub fn descriptor(&self) -> Result<AssetDescriptor> {
        let digest: Sha256Digest = self
            .sha256
            .parse()
            .with_context(|| format!("asset {}: bad sha256", self.file_name))?;
        Ok(AssetDescriptor::new(self.file_name.clone(), digest)?)
    }
}

/// Global configuration loaded from `~/.config/carton/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartonConfig {
    /// Cache root; `~/.carton` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_root: Option<PathBuf>,
    /// URL of the static asset zip archive.
    pub archive_url: String,
    /// Expected SHA-256 of the archive (hex).
    pub archive_sha256: String,
    /// Seconds allowed for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole archive request.
    pub timeout_secs: u64,
    /// Assets checked by `carton ensure` when none is given on the command line.
    #[serde(default)]
    pub assets: Vec<AssetConfig>,
}

impl Default for CartonConfig {
    fn default() -> Self {
        Self {
            cache_root: None,
            archive_url: release::ARCHIVE_URL.to_string(),
            archive_sha256: format!("{:X}", release::ARCHIVE_SHA256),
            connect_timeout_secs: 30,
            timeout_secs: 300,
            assets: Vec::new(),
        }
    }
}

impl CartonConfig {
    /// Validates the config and turns it into explicit fetcher settings.
    pub fn settings(&self) -> Result<FetcherSettings> {
        let cache_root = match &self.cache_root {
            Some(root) => root.clone(),
            None => default_cache_root()?,
        };
        url::Url::parse(&self.archive_url)
            .with_context(|| format!("invalid archive_url {:?}", self.archive_url))?;
        let archive_sha256: Sha256Digest = self
            .archive_sha256
            .parse()
            .context("invalid archive_sha256")?;
        if self.connect_timeout_secs == 0 || self.timeout_secs == 0 {
            anyhow::bail!("timeouts must be at least one second");
        }
        Ok(FetcherSettings {
            cache_root,
            archive_url: self.archive_url.clone(),
            archive_sha256,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// Descriptors for every configured asset.
    pub fn assets(&self) -> Result<Vec<AssetDescriptor>> {
        self.assets.iter().map(AssetConfig::descriptor).collect()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("carton")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CartonConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CartonConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CartonConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_pins_release_archive() {
        let cfg = CartonConfig::default();
        assert_eq!(cfg.archive_url, release::ARCHIVE_URL);
        assert_eq!(
            cfg.archive_sha256,
            "1DCC1A8B893CFDF607F39ABE22F1B7225B7B418666DF98522C7BE55473D23E8A"
        );
        assert!(cfg.assets.is_empty());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = CartonConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CartonConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.archive_url, cfg.archive_url);
        assert_eq!(parsed.archive_sha256, cfg.archive_sha256);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
        assert!(parsed.cache_root.is_none());
    }

    #[test]
    fn config_toml_custom_values_and_assets() {
        let toml = r#"
            cache_root = "/tmp/carton-cache"
            archive_url = "http://127.0.0.1:8080/static.zip"
            archive_sha256 = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
            connect_timeout_secs = 5
            timeout_secs = 60

            [[assets]]
            file_name = "dev.js"
            sha256 = "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        "#;
        let cfg: CartonConfig = toml::from_str(toml).unwrap();
        let settings = cfg.settings().unwrap();
        assert_eq!(settings.cache_root, PathBuf::from("/tmp/carton-cache"));
        assert_eq!(settings.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert_eq!(
            settings.archive_sha256.to_string(),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );

        let assets = cfg.assets().unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].file_name(), "dev.js");
    }

    #[test]
    fn settings_reject_bad_values() {
        let mut cfg = CartonConfig {
            cache_root: Some(PathBuf::from("/tmp/c")),
            ..CartonConfig::default()
        };
        cfg.archive_url = "not a url".into();
        assert!(cfg.settings().is_err());

        let mut cfg = CartonConfig {
            cache_root: Some(PathBuf::from("/tmp/c")),
            ..CartonConfig::default()
        };
        cfg.archive_sha256 = "1234".into();
        assert!(cfg.settings().is_err());

        let mut cfg = CartonConfig {
            cache_root: Some(PathBuf::from("/tmp/c")),
            ..CartonConfig::default()
        };
        cfg.timeout_secs = 0;
        assert!(cfg.settings().is_err());
    }

    #[test]
    fn bad_asset_entries_are_rejected() {
        let cfg = CartonConfig {
            assets: vec![AssetConfig {
                file_name: "../escape.js".into(),
                sha256: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".into(),
            }],
            ..CartonConfig::default()
        };
        assert!(cfg.assets().is_err());
    }
}
