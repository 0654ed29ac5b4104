//! Static keyword tables.

use crate::seed::FeatureTarget;

/// Keyword fragment to catalog genre, scanned in this order.
pub const GENRE_TABLE: &[(&str, &str)] = &[
    ("rock", "rock"),
    ("pop", "pop"),
    ("jazz", "jazz"),
    ("classical", "classical"),
    ("electronic", "electronic"),
    ("hip-hop", "hip-hop"),
    ("rap", "hip-hop"),
    ("country", "country"),
    ("blues", "blues"),
    ("reggae", "reggae"),
    ("folk", "folk"),
    ("metal", "metal"),
    ("punk", "punk"),
    ("indie", "indie"),
    ("alternative", "alternative"),
    ("r&b", "r-n-b"),
    ("soul", "soul"),
    ("funk", "funk"),
    ("disco", "disco"),
    ("house", "house"),
    ("techno", "techno"),
    ("trance", "trance"),
    ("ambient", "ambient"),
    ("lofi", "lofi"),
    ("chill", "chill"),
    ("energetic", "dance"),
    ("party", "dance"),
    ("romantic", "romance"),
    ("sad", "sad"),
    ("happy", "happy"),
    ("calm", "calm"),
    ("relaxing", "relaxing"),
];

/// High and low keyword sets for one audio feature, with the targets each
/// side emits. The high set is always checked first.
#[derive(Debug)]
pub struct FeatureRule {
    pub high: &'static [&'static str],
    pub high_target: FeatureTarget,
    pub low: &'static [&'static str],
    pub low_target: FeatureTarget,
}

pub const ENERGY_RULE: FeatureRule = FeatureRule {
    high: &["energetic", "upbeat", "fast", "dance", "party", "workout"],
    high_target: FeatureTarget::at_least(0.8, 0.6),
    low: &["calm", "relaxing", "chill", "sleep", "study"],
    low_target: FeatureTarget::at_most(0.3, 0.5),
};

pub const VALENCE_RULE: FeatureRule = FeatureRule {
    high: &["happy", "joyful", "cheerful", "upbeat"],
    high_target: FeatureTarget::at_least(0.8, 0.6),
    low: &["sad", "melancholy", "depressing"],
    low_target: FeatureTarget::at_most(0.3, 0.5),
};

/// Tempo targets are in beats per minute.
pub const TEMPO_RULE: FeatureRule = FeatureRule {
    high: &["fast", "energetic", "workout", "dance"],
    high_target: FeatureTarget::at_least(130.0, 110.0),
    low: &["slow", "calm", "relaxing"],
    low_target: FeatureTarget::at_most(80.0, 100.0),
};

pub const MOOD_WORDS: &[&str] = &["happy", "sad", "energetic", "calm", "romantic", "melancholy"];

pub const GENRE_WORDS: &[&str] = &[
    "rock",
    "pop",
    "jazz",
    "classical",
    "electronic",
    "hip-hop",
    "country",
];

pub const ACTIVITY_WORDS: &[&str] = &["workout", "study", "party", "sleep", "driving", "running"];
