//! Recommendation fetcher.
//!
//! Turns an emotion category into at most one song: a random search phrase
//! is sent to the video search client, and one result is drawn with a
//! preference for playlist-like titles. Every failure on the way (transport,
//! HTTP status, decoding, timeout) is logged and collapses into "no song".

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::random::RandomSource;
use super::selection::{build_search_phrase, select_video};
use crate::config::SearchConfig;
use crate::emotion::EmotionCategory;
use crate::search::{VideoSearchClient, VideoSearchQuery};
use crate::session::RecommendedSong;

/// Result of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(RecommendedSong),
    /// Search failed or returned nothing usable.
    NotFound,
    /// The caller cancelled before the search completed.
    Cancelled,
}

impl FetchOutcome {
    pub fn into_song(self) -> Option<RecommendedSong> {
        match self {
            Self::Found(song) => Some(song),
            Self::NotFound | Self::Cancelled => None,
        }
    }
}

#[derive(Clone)]
pub struct RecommendationFetcher {
    client: Arc<dyn VideoSearchClient>,
    config: SearchConfig,
    random: Arc<RandomSource>,
}

impl RecommendationFetcher {
    pub fn new(
        client: Arc<dyn VideoSearchClient>,
        config: SearchConfig,
        random: Arc<RandomSource>,
    ) -> Self {
        Self {
            client,
            config,
            random,
        }
    }

    /// Fetches one recommendation, or `None` when none could be found.
    pub async fn fetch_recommendation(&self, category: &EmotionCategory) -> Option<RecommendedSong> {
        self.fetch(category, &CancellationToken::new())
            .await
            .into_song()
    }

    /// Fetches one recommendation, giving up early when `cancel` fires.
    ///
    /// The search is bounded by `SearchConfig::timeout_secs`.
    pub async fn fetch(&self, category: &EmotionCategory, cancel: &CancellationToken) -> FetchOutcome {
        let Some(phrase) = build_search_phrase(category, &self.random) else {
            tracing::warn!(emotion = %category.label, "Category has no search terms");
            return FetchOutcome::NotFound;
        };

        let query = VideoSearchQuery::new(phrase, &self.config);
        tracing::debug!(emotion = %category.label, q = %query.q, "Searching for a song");

        let timeout = self.config.timeout();
        let search = tokio::time::timeout(timeout, self.client.search(&query));

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(emotion = %category.label, "Song search cancelled");
                return FetchOutcome::Cancelled;
            }
            result = search => result,
        };

        let items = match result {
            Ok(Ok(items)) => items,
            Ok(Err(e)) => {
                tracing::warn!(emotion = %category.label, error = %e, "Video search failed");
                return FetchOutcome::NotFound;
            }
            Err(_) => {
                tracing::warn!(emotion = %category.label, ?timeout, "Video search timed out");
                return FetchOutcome::NotFound;
            }
        };

        match select_video(&items, &self.random) {
            Some(item) => {
                tracing::info!(
                    emotion = %category.label,
                    video_id = %item.video_id,
                    candidates = items.len(),
                    "Selected song"
                );
                FetchOutcome::Found(RecommendedSong::from_video(item))
            }
            None => {
                tracing::info!(emotion = %category.label, q = %query.q, "Video search returned no items");
                FetchOutcome::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EmuseError, Result};
    use crate::search::VideoItem;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Reply {
        Items(Vec<VideoItem>),
        Fail(EmuseError),
        Hang,
    }

    struct MockClient {
        reply: Reply,
        queries: Mutex<Vec<VideoSearchQuery>>,
    }

    impl MockClient {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl VideoSearchClient for MockClient {
        async fn search(&self, query: &VideoSearchQuery) -> Result<Vec<VideoItem>> {
            self.queries.lock().unwrap().push(query.clone());
            match &self.reply {
                Reply::Items(items) => Ok(items.clone()),
                Reply::Fail(e) => Err(e.clone()),
                Reply::Hang => {
                    std::future::pending::<()>().await;
                    Ok(Vec::new())
                }
            }
        }
    }

    fn category() -> EmotionCategory {
        EmotionCategory::new("happy", ["행복"], ["좋아요"], ["happy kpop playlist", "upbeat kpop songs"])
    }

    fn fetcher(client: Arc<MockClient>) -> RecommendationFetcher {
        RecommendationFetcher::new(client, SearchConfig::default(), Arc::new(RandomSource::seeded(42)))
    }

    #[tokio::test]
    async fn test_empty_results_return_none() {
        let client = MockClient::new(Reply::Items(vec![]));
        let song = fetcher(client).fetch_recommendation(&category()).await;
        assert!(song.is_none());
    }

    #[tokio::test]
    async fn test_client_error_returns_none() {
        let client = MockClient::new(Reply::Fail(EmuseError::api(403, "quotaExceeded")));
        let song = fetcher(client).fetch_recommendation(&category()).await;
        assert!(song.is_none());
    }

    #[tokio::test]
    async fn test_playlist_item_selected_and_mapped() {
        let client = MockClient::new(Reply::Items(vec![
            VideoItem::new("v1", "Random MV"),
            VideoItem::new("v2", "Happy Playlist 2024"),
            VideoItem::new("v3", "Live stage"),
        ]));
        let fetcher = fetcher(client);
        for _ in 0..20 {
            let song = fetcher.fetch_recommendation(&category()).await.unwrap();
            assert_eq!(song.title, "Happy Playlist 2024");
            assert_eq!(song.url, "https://www.youtube.com/watch?v=v2");
            assert_eq!(song.platform, "YouTube");
        }
    }

    #[tokio::test]
    async fn test_query_carries_search_settings() {
        let client = MockClient::new(Reply::Items(vec![VideoItem::new("v1", "x")]));
        fetcher(client.clone()).fetch_recommendation(&category()).await;

        let queries = client.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        let query = &queries[0];
        assert_eq!(query.video_category_id, "10");
        assert_eq!(query.max_results, 20);
        assert_eq!(query.relevance_language, "ko");
        let (term, suffix) = query.q.rsplit_once(' ').unwrap();
        assert!(category().search_terms.iter().any(|t| t == term));
        assert!(suffix.parse::<u32>().unwrap() < 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_search_times_out() {
        let client = MockClient::new(Reply::Hang);
        let config = SearchConfig {
            timeout_secs: 2,
            ..SearchConfig::default()
        };
        let fetcher = RecommendationFetcher::new(client, config, Arc::new(RandomSource::seeded(1)));

        let outcome = fetcher.fetch(&category(), &CancellationToken::new()).await;
        assert_eq!(outcome, FetchOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_cancelled_search_reports_cancelled() {
        let client = MockClient::new(Reply::Hang);
        let fetcher = fetcher(client);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let outcome = fetcher.fetch(&category(), &cancel).await;
        assert_eq!(outcome, FetchOutcome::Cancelled);
    }
}
