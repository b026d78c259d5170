//! Core session domain model.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;
use crate::search::VideoItem;

pub const YOUTUBE_PLATFORM: &str = "YouTube";
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// A song handed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedSong {
    pub title: String,
    pub platform: String,
    pub url: String,
}

impl RecommendedSong {
    /// Builds a song from a search hit using the canonical watch URL.
    pub fn from_video(item: &VideoItem) -> Self {
        Self {
            title: item.title.clone(),
            platform: YOUTUBE_PLATFORM.to_string(),
            url: format!("{}{}", YOUTUBE_WATCH_URL, item.video_id),
        }
    }
}

/// In-memory chat session.
///
/// Both the transcript and the recommended list only grow; `reset` is the
/// one operation that empties them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    messages: Vec<ChatMessage>,
    songs: Vec<RecommendedSong>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            messages: Vec::new(),
            songs: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn songs(&self) -> &[RecommendedSong] {
        &self.songs
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::bot(text));
    }

    pub fn record_song(&mut self, song: RecommendedSong) {
        self.songs.push(song);
    }

    /// Text of the most recent user message, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.text.as_str())
    }

    /// Clears the transcript and the recommended list.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.songs.clear();
    }

    /// Serializes recommended songs for the clipboard: title and URL on
    /// consecutive lines, entries separated by a blank line.
    ///
    /// Returns `None` when nothing has been recommended yet.
    pub fn recommendations_text(&self) -> Option<String> {
        if self.songs.is_empty() {
            return None;
        }
        Some(
            self.songs
                .iter()
                .map(|song| format!("{}\n{}", song.title, song.url))
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}
