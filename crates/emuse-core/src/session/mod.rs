//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: In-memory chat session (`Session`, `RecommendedSong`)
//! - `message`: Transcript message types (`MessageRole`, `ChatMessage`)
//!
//! # Usage
//!
//! ```ignore
//! use emuse_core::session::{ChatMessage, MessageRole, RecommendedSong, Session};
//! ```

mod message;
mod model;

// Re-export public API
pub use message::{ChatMessage, MessageRole};
pub use model::{RecommendedSong, Session};
