//! Heuristic keyword scan used when the extraction provider is unavailable.

use crate::seed::tables::{ACTIVITY_WORDS, GENRE_WORDS, MOOD_WORDS};

/// Most keywords the heuristic scan returns
pub const MAX_FALLBACK_KEYWORDS: usize = 5;

/// Picks mood, genre and activity words contained in the message.
///
/// Words are reported in list order (moods, then genres, then activities).
pub fn heuristic_keywords(message: &str) -> Vec<String> {
    let message = message.to_lowercase();

    MOOD_WORDS
        .iter()
        .chain(GENRE_WORDS)
        .chain(ACTIVITY_WORDS)
        .filter(|word| message.contains(*word))
        .take(MAX_FALLBACK_KEYWORDS)
        .map(|word| word.to_string())
        .collect()
}
