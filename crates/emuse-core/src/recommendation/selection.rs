//! Pure selection rules for search phrases and search results.

use super::random::RandomSource;
use crate::emotion::EmotionCategory;
use crate::search::VideoItem;

/// Exclusive upper bound of the numeric suffix appended to a search phrase.
pub const QUERY_SUFFIX_BOUND: u32 = 1000;

/// Picks one of the category's search terms and appends a random number so
/// repeated searches for the same mood return different results.
///
/// Returns `None` only for a category without search terms, which a
/// validated lexicon never contains.
pub fn build_search_phrase(category: &EmotionCategory, random: &RandomSource) -> Option<String> {
    let term = random.choose(&category.search_terms)?;
    Some(format!("{} {}", term, random.below(QUERY_SUFFIX_BOUND)))
}

/// Chooses one result, preferring titles that mention "playlist".
///
/// When at least one title qualifies the draw is restricted to those items,
/// otherwise it covers the whole list.
pub fn select_video<'a>(items: &'a [VideoItem], random: &RandomSource) -> Option<&'a VideoItem> {
    let playlists: Vec<&VideoItem> = items.iter().filter(|v| v.is_playlist_like()).collect();
    if playlists.is_empty() {
        random.choose(items)
    } else {
        random.choose(&playlists).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(titles: &[&str]) -> Vec<VideoItem> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| VideoItem::new(format!("id{i}"), *t))
            .collect()
    }

    #[test]
    fn test_empty_results_select_nothing() {
        let random = RandomSource::seeded(1);
        assert!(select_video(&[], &random).is_none());
    }

    #[test]
    fn test_playlist_titles_are_preferred() {
        let random = RandomSource::seeded(11);
        let results = items(&[
            "Song one",
            "Chill PLAYLIST vol.1",
            "Song two",
            "kpop playlist 2024",
            "Song three",
        ]);
        for _ in 0..200 {
            let picked = select_video(&results, &random).unwrap();
            assert!(picked.is_playlist_like(), "picked {}", picked.title);
        }
    }

    #[test]
    fn test_without_playlists_all_items_are_candidates() {
        let random = RandomSource::seeded(5);
        let results = items(&["a", "b", "c"]);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(select_video(&results, &random).unwrap().video_id.clone());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_search_phrase_has_numeric_suffix() {
        let random = RandomSource::seeded(9);
        let category = EmotionCategory::new("happy", ["joy"], ["yay"], ["happy kpop playlist"]);
        let phrase = build_search_phrase(&category, &random).unwrap();

        let (term, suffix) = phrase.rsplit_once(' ').unwrap();
        assert_eq!(term, "happy kpop playlist");
        let n: u32 = suffix.parse().unwrap();
        assert!(n < QUERY_SUFFIX_BOUND);
    }

    #[test]
    fn test_search_phrase_draws_from_category_terms() {
        let random = RandomSource::seeded(2);
        let category = EmotionCategory::new("sad", ["down"], ["aww"], ["ballad", "acoustic"]);
        for _ in 0..50 {
            let phrase = build_search_phrase(&category, &random).unwrap();
            let (term, _) = phrase.rsplit_once(' ').unwrap();
            assert!(category.search_terms.iter().any(|t| t == term));
        }
    }
}
