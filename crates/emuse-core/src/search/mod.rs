//! Video search boundary.
//!
//! The recommendation fetcher only knows the `VideoSearchClient` trait; the
//! HTTP implementation lives in the interaction crate.

pub mod model;
pub mod service;

pub use model::{VideoItem, VideoSearchQuery};
pub use service::VideoSearchClient;
