//! Core domain of the Emuse song recommender: the emotion lexicon and
//! classifier, the recommendation fetcher and the in-memory chat session.

pub mod config;
pub mod emotion;
pub mod error;
pub mod recommendation;
pub mod search;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::EmuseError;

pub use emotion::{ClassificationResult, EmotionCategory, EmotionLexicon, classify};
pub use recommendation::{FetchOutcome, RandomSource, RecommendationFetcher};
pub use session::{ChatMessage, MessageRole, RecommendedSong, Session};
