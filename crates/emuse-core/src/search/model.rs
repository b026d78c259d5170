//! Video search domain models.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

/// Parameters of a single video-search request.
///
/// `part=snippet` and `type=video` are fixed by the client and not modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSearchQuery {
    /// Free-text query, already carrying its random suffix.
    pub q: String,
    /// Result category filter (`10` is Music on YouTube).
    pub video_category_id: String,
    /// Maximum number of results to request.
    pub max_results: u32,
    /// Language hint for ranking results.
    pub relevance_language: String,
}

impl VideoSearchQuery {
    pub fn new(q: impl Into<String>, config: &SearchConfig) -> Self {
        Self {
            q: q.into(),
            video_category_id: config.video_category_id.clone(),
            max_results: config.max_results,
            relevance_language: config.relevance_language.clone(),
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub video_id: String,
    pub title: String,
}

impl VideoItem {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
        }
    }

    /// Whether the title mentions "playlist", ignoring case.
    pub fn is_playlist_like(&self) -> bool {
        self.title.to_lowercase().contains("playlist")
    }
}
