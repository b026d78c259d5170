pub mod youtube_api_client;

pub use youtube_api_client::YouTubeApiClient;

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use emuse_core::config::SearchConfig;
use emuse_core::search::VideoSearchClient;
use emuse_core::session::{ChatMessage, RecommendedSong, Session};
use emuse_core::{EmotionCategory, EmotionLexicon, FetchOutcome, RandomSource, RecommendationFetcher, classify};

/// Greeting shown at the top of a fresh session.
pub const GREETING: &str = "안녕하세요! 기분을 말해주시면 노래를 추천해드릴게요 🎶";

/// Reply when no emotion keyword was found in the input.
pub const CLARIFICATION: &str =
    "조금 더 자세히 말씀해 주실 수 있나요? 😊\n지금 어떤 기분이신지 알려주시면 더 좋을 것 같아요.";

/// Reply when a song could not be found, in both the send and "more" flows.
pub const SONG_NOT_FOUND: &str = "죄송합니다. 다른 노래를 찾지 못했어요. 다시 시도해보시겠어요?";

fn announce_first(song: &RecommendedSong) -> String {
    format!("추천 노래:\n{}\n{}", song.title, song.url)
}

fn announce_more(song: &RecommendedSong) -> String {
    format!("이 곡도 추천드려요! 🎵\n{}\n{}", song.title, song.url)
}

/// Result of handling one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionResult {
    /// Empty input; nothing changed.
    NoOp,
    /// Bot messages appended to the transcript by this action, in order.
    NewMessages(Vec<ChatMessage>),
    /// Another send/more action is still running; this one was rejected.
    Busy,
    /// The session was reset while this action was waiting on the search.
    Cancelled,
}

/// Manages user interaction and the chat session.
///
/// The `InteractionManager` handles:
/// - Classifying user input and replying
/// - Fetching recommendations and recording them in the session
/// - A single-slot guard so only one send/more action runs at a time
/// - Cancelling an in-flight search when the session is reset
pub struct InteractionManager {
    lexicon: Arc<EmotionLexicon>,
    fetcher: RecommendationFetcher,
    random: Arc<RandomSource>,
    session: Arc<RwLock<Session>>,
    /// Held for the whole duration of a send/more action
    in_flight: Mutex<()>,
    /// Token of the current session generation; replaced on reset
    cancel: std::sync::Mutex<CancellationToken>,
    /// Parent of every generation token; cancelled once on shutdown
    shutdown: CancellationToken,
}

impl InteractionManager {
    /// Creates a new session seeded with the greeting message.
    ///
    /// # Arguments
    ///
    /// * `lexicon` - Emotion table used for classification
    /// * `client` - Video search backend
    /// * `config` - Search settings (query parameters, timeout)
    pub fn new_session(
        lexicon: Arc<EmotionLexicon>,
        client: Arc<dyn VideoSearchClient>,
        config: SearchConfig,
    ) -> Self {
        Self::with_random(lexicon, client, config, Arc::new(RandomSource::from_entropy()))
    }

    /// Same as `new_session` with an explicit random source.
    pub fn with_random(
        lexicon: Arc<EmotionLexicon>,
        client: Arc<dyn VideoSearchClient>,
        config: SearchConfig,
        random: Arc<RandomSource>,
    ) -> Self {
        let mut session = Session::new();
        session.push_bot(GREETING);
        tracing::info!(session_id = %session.id, "Started new session");

        let shutdown = CancellationToken::new();
        Self {
            lexicon,
            fetcher: RecommendationFetcher::new(client, config, Arc::clone(&random)),
            random,
            session: Arc::new(RwLock::new(session)),
            in_flight: Mutex::new(()),
            cancel: std::sync::Mutex::new(shutdown.child_token()),
            shutdown,
        }
    }

    /// Handles one submitted line of user text.
    pub async fn handle_input(&self, input: &str) -> InteractionResult {
        let text = input.trim();
        if text.is_empty() {
            return InteractionResult::NoOp;
        }

        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("Rejected input while another request is in flight");
            return InteractionResult::Busy;
        };
        let cancel = self.current_token();
        if cancel.is_cancelled() {
            return InteractionResult::Cancelled;
        }

        let category = classify(&self.lexicon, text).category();
        let mut appended = Vec::new();
        {
            let mut session = self.session.write().await;
            if cancel.is_cancelled() {
                return InteractionResult::Cancelled;
            }
            session.push_user(text);
            match category {
                Some(category) => {
                    tracing::info!(session_id = %session.id, emotion = %category.label, "Classified input");
                    if let Some(reply) = self.random.choose(&category.responses) {
                        session.push_bot(reply.as_str());
                        appended.extend(session.messages().last().cloned());
                    }
                }
                None => {
                    tracing::info!(session_id = %session.id, "No emotion keyword in input");
                    session.push_bot(CLARIFICATION);
                    appended.extend(session.messages().last().cloned());
                }
            }
        }

        let Some(category) = category else {
            return InteractionResult::NewMessages(appended);
        };

        match self.fetch_and_record(category, &cancel, announce_first).await {
            Some(message) => {
                appended.push(message);
                InteractionResult::NewMessages(appended)
            }
            None => InteractionResult::Cancelled,
        }
    }

    /// Fetches another song for the emotion of the most recent user message.
    ///
    /// The category is re-derived from the transcript on every call.
    pub async fn fetch_another(&self) -> InteractionResult {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("Rejected fetch-another while another request is in flight");
            return InteractionResult::Busy;
        };
        let cancel = self.current_token();
        if cancel.is_cancelled() {
            return InteractionResult::Cancelled;
        }

        let last_user_text = self
            .session
            .read()
            .await
            .last_user_text()
            .map(str::to_owned);
        let category = last_user_text
            .as_deref()
            .and_then(|text| classify(&self.lexicon, text).category());

        let Some(category) = category else {
            let mut session = self.session.write().await;
            if cancel.is_cancelled() {
                return InteractionResult::Cancelled;
            }
            session.push_bot(SONG_NOT_FOUND);
            return InteractionResult::NewMessages(session.messages().last().cloned().into_iter().collect());
        };

        match self.fetch_and_record(category, &cancel, announce_more).await {
            Some(message) => InteractionResult::NewMessages(vec![message]),
            None => InteractionResult::Cancelled,
        }
    }

    /// Runs the fetcher and appends either the announcement or the apology.
    ///
    /// Returns `None` when the action was cancelled; the transcript is left
    /// untouched in that case.
    async fn fetch_and_record(
        &self,
        category: &EmotionCategory,
        cancel: &CancellationToken,
        announce: fn(&RecommendedSong) -> String,
    ) -> Option<ChatMessage> {
        let outcome = self.fetcher.fetch(category, cancel).await;

        let mut session = self.session.write().await;
        // A reset cancels the token before taking the write lock, so this
        // check cannot race with it.
        if cancel.is_cancelled() {
            return None;
        }

        match outcome {
            FetchOutcome::Found(song) => {
                tracing::info!(session_id = %session.id, url = %song.url, "Recorded recommendation");
                session.push_bot(announce(&song));
                session.record_song(song);
            }
            FetchOutcome::NotFound => {
                session.push_bot(SONG_NOT_FOUND);
            }
            FetchOutcome::Cancelled => return None,
        }
        session.messages().last().cloned()
    }

    /// Clears the transcript and the recommended list, cancelling any
    /// in-flight search first.
    pub async fn reset(&self) {
        self.cancel_in_flight();
        let mut session = self.session.write().await;
        session.reset();
        tracing::info!(session_id = %session.id, "Session reset");
    }

    /// Cancels the running action and every action started afterwards.
    ///
    /// Called by the front-end on exit so that a task spawned just before
    /// quitting cannot pick up a live token and keep the runtime waiting.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        tracing::info!("Interaction manager shut down");
    }

    /// Cancels the running action (if any) and starts a new generation.
    fn cancel_in_flight(&self) {
        let mut token = self
            .cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        token.cancel();
        // A child of a cancelled parent starts out cancelled
        *token = self.shutdown.child_token();
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether a send/more action is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Returns a snapshot of the transcript.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.session.read().await.messages().to_vec()
    }

    /// Returns the songs recommended so far, oldest first.
    pub async fn recommended_songs(&self) -> Vec<RecommendedSong> {
        self.session.read().await.songs().to_vec()
    }

    /// Clipboard text for the recommended list, `None` when it is empty.
    pub async fn recommendations_text(&self) -> Option<String> {
        self.session.read().await.recommendations_text()
    }

    /// Returns the session ID.
    pub async fn session_id(&self) -> String {
        self.session.read().await.id.clone()
    }

    /// Whether `handle_input` would start a song search for this text.
    ///
    /// Front-ends use it to show a searching indicator up front.
    pub fn would_search(&self, input: &str) -> bool {
        classify(&self.lexicon, input.trim()).is_match()
    }
}
