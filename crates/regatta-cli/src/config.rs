//! Application configuration management.
//!
//! The configuration names the store document and whether logs are also
//! written to a file. It is stored at `~/.config/regatta/config.json`; the
//! `REGATTA_STORE` environment variable (also read from `.env`) overrides
//! the store path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "regatta";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default store document name inside the data directory
const STORE_FILE: &str = "regatta.json";

/// Environment variable overriding the store path
pub const STORE_ENV: &str = "REGATTA_STORE";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub log_to_file: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Read the config at `path`; a missing file means defaults
    fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("Could not read {}", path.display())),
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create {}", dir.display()))?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Could not write {}", path.display()))
    }

    fn config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
            .context("Could not find config directory")
    }

    fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .context("Could not find data directory")
    }

    /// Store document path: environment, then config, then the data directory
    pub fn store_path(&self) -> Result<PathBuf> {
        let from_env = std::env::var(STORE_ENV).ok();
        if let Some(path) = resolve_store_path(from_env.as_deref(), self.store_path.as_deref()) {
            return Ok(path);
        }
        Ok(Self::data_dir()?.join(STORE_FILE))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }
}

/// An explicit store path, if one is set. Blank environment values are ignored.
fn resolve_store_path(from_env: Option<&str>, configured: Option<&Path>) -> Option<PathBuf> {
    from_env
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_config() {
        let configured = PathBuf::from("/srv/regatta.json");
        assert_eq!(
            resolve_store_path(Some("/tmp/other.json"), Some(&configured)),
            Some(PathBuf::from("/tmp/other.json"))
        );
    }

    #[test]
    fn test_blank_env_falls_back_to_config() {
        let configured = PathBuf::from("/srv/regatta.json");
        assert_eq!(
            resolve_store_path(Some("  "), Some(&configured)),
            Some(configured.clone())
        );
        assert_eq!(resolve_store_path(None, None), None);
    }

    #[test]
    fn test_save_then_load_store_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regatta").join(CONFIG_FILE);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let config = Config {
            store_path: Some(PathBuf::from("/srv/club.json")),
            log_to_file: true,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_config_defaults_when_fields_missing() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.log_to_file);
    }
}
