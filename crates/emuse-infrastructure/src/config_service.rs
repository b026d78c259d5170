//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/emuse/config.toml).

use crate::paths::EmusePaths;
use anyhow::{Context, Result};
use emuse_core::config::RootConfig;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// A missing file yields the defaults; a malformed file is an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: EmusePaths,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(paths: EmusePaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| anyhow::anyhow!("config cache lock poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self
                .config
                .write()
                .map_err(|_| anyhow::anyhow!("config cache lock poisoned"))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    fn load_config(&self) -> Result<RootConfig> {
        let config_path = self.get_config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: RootConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        config
            .search
            .validate()
            .with_context(|| format!("Invalid [search] section in {}", config_path.display()))?;

        tracing::info!(
            path = %config_path.display(),
            custom_emotions = config.emotions.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn get_config_path(&self) -> Result<PathBuf> {
        self.paths
            .config_file()
            .map_err(|e| anyhow::anyhow!("Failed to get config path: {}", e))
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(EmusePaths::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(EmusePaths::new(Some(dir.path())))
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = service(&temp_dir).get_config().unwrap();
        assert_eq!(config, RootConfig::default());
    }

    #[test]
    fn test_reads_and_caches_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[search]\nmax_results = 7\n").unwrap();

        let service = service(&temp_dir);
        assert_eq!(service.get_config().unwrap().search.max_results, 7);

        // Later edits are not seen by an already loaded service
        std::fs::write(&config_path, "[search]\nmax_results = 9\n").unwrap();
        assert_eq!(service.get_config().unwrap().search.max_results, 7);
    }

    #[test]
    fn test_out_of_range_search_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(&config_path, "[search]\ntimeout_secs = 0\n").unwrap();
        let err = service(&temp_dir).get_config().unwrap_err();
        assert!(err.to_string().contains("Invalid [search] section"));

        std::fs::write(&config_path, "[search]\nmax_results = 51\n").unwrap();
        let err = service(&temp_dir).get_config().unwrap_err();
        assert!(format!("{:#}", err).contains("max_results"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "[search\n").unwrap();

        let err = service(&temp_dir).get_config().unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
