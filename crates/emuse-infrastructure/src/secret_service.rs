//! Secret service implementation.
//!
//! This module provides a service for loading the YouTube API key from the
//! `EMUSE_YOUTUBE_API_KEY` environment variable or from secret.json.

use crate::paths::EmusePaths;
use emuse_core::config::{SecretConfig, YouTubeConfig};
use emuse_core::error::{EmuseError, Result};
use emuse_core::secret::SecretService;
use std::sync::{Arc, RwLock};

/// Environment variable that overrides the key stored in secret.json.
pub const YOUTUBE_API_KEY_ENV: &str = "EMUSE_YOUTUBE_API_KEY";

/// Service for managing secret configuration.
///
/// The loaded config is cached to avoid repeated file I/O operations.
///
/// # Example
///
/// ```ignore
/// use emuse_infrastructure::{EmusePaths, SecretServiceImpl};
/// use emuse_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new(EmusePaths::default());
/// let key = service.youtube_api_key().await?;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    paths: EmusePaths,
    env_key: Option<String>,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service that honours the environment override.
    pub fn new(paths: EmusePaths) -> Self {
        let env_key = std::env::var(YOUTUBE_API_KEY_ENV).ok();
        Self::with_env_key(paths, env_key)
    }

    /// Creates a service with an explicit override instead of reading the
    /// process environment.
    pub fn with_env_key(paths: EmusePaths, env_key: Option<String>) -> Self {
        Self {
            paths,
            env_key: env_key.filter(|key| !key.trim().is_empty()),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig> {
        if let Some(key) = &self.env_key {
            return Ok(SecretConfig {
                youtube: Some(YouTubeConfig {
                    api_key: key.clone(),
                }),
            });
        }

        {
            let read_lock = self
                .secrets
                .read()
                .map_err(|_| EmuseError::internal("secret cache lock poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let path = self
            .paths
            .secret_file()
            .map_err(|e| EmuseError::config(format!("Failed to get secret path: {}", e)))?;

        let loaded = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str::<SecretConfig>(&content)?
        } else {
            tracing::debug!("No secret file at {}", path.display());
            SecretConfig::default()
        };

        {
            let mut write_lock = self
                .secrets
                .write()
                .map_err(|_| EmuseError::internal("secret cache lock poisoned"))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_secrets_internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> EmusePaths {
        EmusePaths::new(Some(dir.path()))
    }

    #[tokio::test]
    async fn test_key_from_secret_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{"youtube":{"api_key":"file-key"}}"#,
        )
        .unwrap();

        let service = SecretServiceImpl::with_env_key(paths(&temp_dir), None);
        assert_eq!(service.youtube_api_key().await.unwrap(), "file-key");
    }

    #[tokio::test]
    async fn test_env_key_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{"youtube":{"api_key":"file-key"}}"#,
        )
        .unwrap();

        let service = SecretServiceImpl::with_env_key(paths(&temp_dir), Some("env-key".into()));
        assert_eq!(service.youtube_api_key().await.unwrap(), "env-key");
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::with_env_key(paths(&temp_dir), Some("  ".into()));
        assert!(service.youtube_api_key().await.unwrap_err().is_config());
    }

    #[tokio::test]
    async fn test_empty_template_key_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        paths(&temp_dir).ensure_secret_file().unwrap();

        let service = SecretServiceImpl::with_env_key(paths(&temp_dir), None);
        assert!(service.youtube_api_key().await.unwrap_err().is_config());
    }

    #[tokio::test]
    async fn test_malformed_secret_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("secret.json"), "not json").unwrap();

        let service = SecretServiceImpl::with_env_key(paths(&temp_dir), None);
        let err = service.load_secrets().await.unwrap_err();
        assert!(matches!(err, EmuseError::Serialization { .. }));
    }
}
