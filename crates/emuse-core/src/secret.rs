//! Secret management service trait.
//!
//! Defines the interface for loading the search API key.

use crate::config::SecretConfig;
use crate::error::{EmuseError, Result};

/// Service for managing secret configuration.
///
/// Implementations must never log or embed the key in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Returns the YouTube Data API key.
    async fn youtube_api_key(&self) -> Result<String> {
        self.load_secrets()
            .await?
            .youtube
            .map(|youtube| youtube.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| EmuseError::config("YouTube API key is not configured"))
    }
}
