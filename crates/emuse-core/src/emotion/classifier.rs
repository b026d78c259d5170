//! Keyword-containment emotion classifier.

use super::model::{EmotionCategory, EmotionLexicon};

/// Outcome of classifying one user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationResult<'a> {
    Matched(&'a EmotionCategory),
    NoMatch,
}

impl<'a> ClassificationResult<'a> {
    pub fn category(self) -> Option<&'a EmotionCategory> {
        match self {
            Self::Matched(category) => Some(category),
            Self::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Maps `text` to the first category (in declaration order) with a keyword
/// contained in it, ignoring case.
///
/// An input may contain keywords of several categories; only the earliest
/// declared one is returned.
pub fn classify<'a>(lexicon: &'a EmotionLexicon, text: &str) -> ClassificationResult<'a> {
    let lowered = text.to_lowercase();
    lexicon
        .categories()
        .iter()
        .find(|category| category.matches_lowered(&lowered))
        .map_or(ClassificationResult::NoMatch, ClassificationResult::Matched)
}
