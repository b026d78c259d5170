//! Video search client trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::{VideoItem, VideoSearchQuery};

/// Client for an external video-search API.
#[async_trait]
pub trait VideoSearchClient: Send + Sync {
    /// Executes one search request.
    ///
    /// # Returns
    /// The result items in the order the API returned them. A response with
    /// no `items` array is an empty list, not an error.
    async fn search(&self, query: &VideoSearchQuery) -> Result<Vec<VideoItem>>;
}
