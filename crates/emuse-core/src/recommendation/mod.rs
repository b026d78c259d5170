//! Song recommendation: phrase selection, external search, result choice.

pub mod fetcher;
pub mod random;
pub mod selection;

pub use fetcher::{FetchOutcome, RecommendationFetcher};
pub use random::RandomSource;
pub use selection::{build_search_phrase, select_video};
