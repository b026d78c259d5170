//! Emotion lexicon and keyword classifier.

pub mod classifier;
pub mod model;

pub use classifier::{ClassificationResult, classify};
pub use model::{EmotionCategory, EmotionLexicon};
