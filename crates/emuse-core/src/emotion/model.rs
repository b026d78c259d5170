//! Emotion category domain models.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{EmuseError, Result};

/// A fixed emotion label with the keywords that select it, the replies the
/// bot may give, and the search phrases used to look up a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCategory {
    /// Category label (e.g. "happy").
    pub label: String,
    /// Keywords matched by case-insensitive substring. Stored lower-cased.
    pub keywords: Vec<String>,
    /// Candidate replies, one chosen at random per match.
    pub responses: Vec<String>,
    /// Candidate search phrases, one chosen at random per fetch.
    pub search_terms: Vec<String>,
}

impl EmotionCategory {
    pub fn new<S: Into<String>>(
        label: impl Into<String>,
        keywords: impl IntoIterator<Item = S>,
        responses: impl IntoIterator<Item = S>,
        search_terms: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            responses: responses.into_iter().map(Into::into).collect(),
            search_terms: search_terms.into_iter().map(Into::into).collect(),
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        self.keywords = self
            .keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    /// Returns true when any keyword is a substring of `lowered`.
    ///
    /// `lowered` must already be lower-cased.
    pub fn matches_lowered(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(EmuseError::config("emotion label must not be empty"));
        }
        if self.keywords.is_empty() {
            return Err(EmuseError::config(format!(
                "emotion '{}' has no keywords",
                self.label
            )));
        }
        if self.responses.is_empty() {
            return Err(EmuseError::config(format!(
                "emotion '{}' has no responses",
                self.label
            )));
        }
        if self.search_terms.is_empty() {
            return Err(EmuseError::config(format!(
                "emotion '{}' has no search terms",
                self.label
            )));
        }
        Ok(())
    }
}

/// The ordered, immutable emotion table.
///
/// Declaration order decides ties: the classifier returns the first category
/// with a matching keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionLexicon {
    categories: Vec<EmotionCategory>,
}

impl EmotionLexicon {
    /// Builds a lexicon, rejecting empty tables, duplicate labels and
    /// categories that could never produce a reply or a search.
    pub fn new(categories: Vec<EmotionCategory>) -> Result<Self> {
        if categories.is_empty() {
            return Err(EmuseError::config("emotion lexicon must not be empty"));
        }

        let categories: Vec<EmotionCategory> = categories
            .into_iter()
            .map(EmotionCategory::normalized)
            .collect();

        let mut seen = HashSet::new();
        for category in &categories {
            category.validate()?;
            if !seen.insert(category.label.as_str()) {
                return Err(EmuseError::config(format!(
                    "duplicate emotion label '{}'",
                    category.label
                )));
            }
        }

        Ok(Self { categories })
    }

    /// The built-in Korean lexicon (happy, sad, angry).
    pub fn builtin() -> Arc<EmotionLexicon> {
        Arc::clone(&BUILTIN_LEXICON)
    }

    pub fn categories(&self) -> &[EmotionCategory] {
        &self.categories
    }

    pub fn get(&self, label: &str) -> Option<&EmotionCategory> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

static BUILTIN_LEXICON: Lazy<Arc<EmotionLexicon>> = Lazy::new(|| {
    Arc::new(EmotionLexicon {
        categories: vec![
            EmotionCategory::new(
                "happy",
                ["행복", "기쁨", "즐거움", "신나", "좋아", "웃겨", "재미있", "즐겁"],
                [
                    "행복한 기분이신가요? 😊\n기분 좋은 노래를 추천해드릴게요!",
                    "즐거운 하루 보내고 계시네요! 🎵\n당신의 기분을 더욱 상승시켜줄 노래를 찾아볼게요.",
                ],
                [
                    "happy kpop playlist",
                    "feel good korean songs",
                    "upbeat kpop songs",
                    "energetic korean music",
                    "cheerful kpop hits",
                ],
            ),
            EmotionCategory::new(
                "sad",
                ["슬픔", "우울", "힘들", "외로", "그리워", "이별", "눈물", "아파"],
                [
                    "지금 힘든 시간을 보내고 계시나요? 😢\n당신의 마음을 위로해줄 노래를 찾아볼게요.",
                    "슬픈 감정이 드는군요... 💔\n당신의 마음을 달래줄 노래를 추천해드릴게요.",
                ],
                [
                    "korean ballad playlist",
                    "sad kpop songs",
                    "emotional korean music",
                    "healing kpop songs",
                    "comfort korean music",
                ],
            ),
            EmotionCategory::new(
                "angry",
                ["화나", "짜증", "분노", "열받", "싫어", "미워", "힘들어", "스트레스"],
                [
                    "지금 화가 나시는군요... 😤\n당신의 감정을 해소해줄 노래를 찾아볼게요.",
                    "스트레스 받으시는 것 같아요. 💪\n당신의 분노를 해소해줄 노래를 추천해드릴게요.",
                ],
                [
                    "korean hip hop playlist",
                    "angry kpop songs",
                    "powerful korean music",
                    "energetic kpop hits",
                    "strong korean songs",
                ],
            ),
        ],
    })
});
