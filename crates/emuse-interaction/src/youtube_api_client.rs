//! YouTubeApiClient - Direct REST API implementation of the video search.
//!
//! Calls the YouTube Data API v3 `search` endpoint. The key is loaded
//! through `SecretService` (environment variable or secret.json).

use async_trait::async_trait;
use emuse_core::config::SearchConfig;
use emuse_core::error::{EmuseError, Result};
use emuse_core::search::{VideoItem, VideoSearchClient, VideoSearchQuery};
use emuse_core::secret::SecretService;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Video search client that talks to the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeApiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl YouTubeApiClient {
    /// Creates a new client for the configured endpoint.
    ///
    /// The underlying HTTP client enforces `SearchConfig::timeout_secs` as
    /// its request timeout.
    pub fn new(api_key: impl Into<String>, config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| EmuseError::Http(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Loads the API key from the secret service.
    pub async fn try_from_secrets(
        secrets: &dyn SecretService,
        config: &SearchConfig,
    ) -> Result<Self> {
        let api_key = secrets.youtube_api_key().await?;
        Self::new(api_key, config)
    }

    async fn send_request(&self, query: &VideoSearchQuery) -> Result<SearchResponse> {
        let max_results = query.max_results.to_string();
        let params = [
            ("part", "snippet"),
            ("q", query.q.as_str()),
            ("type", "video"),
            ("videoCategoryId", query.video_category_id.as_str()),
            ("maxResults", max_results.as_str()),
            ("relevanceLanguage", query.relevance_language.as_str()),
            ("key", self.api_key.as_str()),
        ];

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|err| {
                // reqwest errors carry the URL, which includes the key
                let err = err.without_url();
                if err.is_timeout() {
                    EmuseError::Http(format!("YouTube API request timed out: {err}"))
                } else {
                    EmuseError::Http(format!("YouTube API request failed: {err}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read YouTube error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let body = response
            .text()
            .await
            .map_err(|err| EmuseError::Http(format!("Failed to read YouTube response: {}", err.without_url())))?;

        parse_search_response(&body)
    }
}

#[async_trait]
impl VideoSearchClient for YouTubeApiClient {
    async fn search(&self, query: &VideoSearchQuery) -> Result<Vec<VideoItem>> {
        let response = self.send_request(query).await?;
        Ok(extract_items(response))
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: Option<ItemId>,
    snippet: Option<Snippet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

fn parse_search_response(body: &str) -> Result<SearchResponse> {
    serde_json::from_str(body).map_err(|err| EmuseError::Serialization {
        format: "JSON".to_string(),
        message: format!("Failed to parse YouTube response: {err}"),
    })
}

/// Keeps items that carry both a video id and a title, in response order.
fn extract_items(response: SearchResponse) -> Vec<VideoItem> {
    response
        .items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id?.video_id?;
            let title = item.snippet?.title?;
            Some(VideoItem { video_id, title })
        })
        .collect()
}

fn map_http_error(status: StatusCode, body: &str) -> EmuseError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let reason = wrapper
                .error
                .errors
                .into_iter()
                .find_map(|detail| detail.reason)
                .unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if reason.is_empty() {
                msg
            } else {
                format!("{reason}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    EmuseError::api(status.as_u16(), message)
}
