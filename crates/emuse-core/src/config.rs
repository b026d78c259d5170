//! Configuration models for config.toml and secret.json.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::emotion::{EmotionCategory, EmotionLexicon};
use crate::error::{EmuseError, Result};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

/// Largest `maxResults` the search endpoint accepts.
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Root configuration structure for config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    #[serde(default)]
    pub search: SearchConfig,

    /// Custom emotion table. Replaces the built-in one when non-empty.
    #[serde(rename = "emotion", default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<EmotionCategory>,
}

impl RootConfig {
    /// Returns the lexicon this configuration selects.
    pub fn lexicon(&self) -> Result<Arc<EmotionLexicon>> {
        if self.emotions.is_empty() {
            return Ok(EmotionLexicon::builtin());
        }
        Ok(Arc::new(EmotionLexicon::new(self.emotions.clone())?))
    }
}

/// Video search settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub video_category_id: String,
    pub max_results: u32,
    pub relevance_language: String,
    /// Upper bound for one search request, in seconds.
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rejects values the search API would refuse or that make every
    /// request time out.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(EmuseError::config("search.timeout_secs must be at least 1"));
        }
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(EmuseError::config(format!(
                "search.max_results must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT, self.max_results
            )));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            video_category_id: "10".to_string(),
            max_results: 20,
            relevance_language: "ko".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Root configuration structure for secret.json
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub youtube: Option<YouTubeConfig>,
}

/// YouTube Data API configuration
#[derive(Deserialize, Serialize, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
}

impl std::fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.search.timeout(), Duration::from_secs(10));
        assert_eq!(config.lexicon().unwrap().len(), 3);
    }

    #[test]
    fn test_partial_search_section() {
        let config: RootConfig = toml::from_str(
            r#"
            [search]
            max_results = 5
            relevance_language = "en"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.relevance_language, "en");
        assert_eq!(config.search.video_category_id, "10");
        assert_eq!(config.search.endpoint, DEFAULT_SEARCH_ENDPOINT);
    }

    #[test]
    fn test_custom_lexicon_replaces_builtin() {
        let config: RootConfig = toml::from_str(
            r#"
            [[emotion]]
            label = "calm"
            keywords = ["Relaxed"]
            responses = ["Nice."]
            search_terms = ["lofi playlist"]
            "#,
        )
        .unwrap();
        let lexicon = config.lexicon().unwrap();
        assert_eq!(lexicon.len(), 1);
        assert_eq!(lexicon.categories()[0].keywords, vec!["relaxed"]);
    }

    #[test]
    fn test_invalid_custom_lexicon_is_config_error() {
        let config: RootConfig = toml::from_str(
            r#"
            [[emotion]]
            label = "calm"
            keywords = ["relaxed"]
            responses = []
            search_terms = ["lofi"]
            "#,
        )
        .unwrap();
        assert!(config.lexicon().unwrap_err().is_config());
    }

    #[test]
    fn test_default_search_config_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config: RootConfig = toml::from_str("[search]\ntimeout_secs = 0\n").unwrap();
        let err = config.search.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_max_results_bounds() {
        let mut search = SearchConfig {
            max_results: MAX_RESULTS_LIMIT,
            ..SearchConfig::default()
        };
        assert!(search.validate().is_ok());

        search.max_results = MAX_RESULTS_LIMIT + 1;
        assert!(search.validate().unwrap_err().is_config());

        search.max_results = 0;
        assert!(search.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let secret: SecretConfig =
            serde_json::from_str(r#"{"youtube":{"api_key":"AIza-secret"}}"#).unwrap();
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("redacted"));
    }
}
