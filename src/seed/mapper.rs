//! Keyword to SeedSpec mapping.

use crate::seed::tables::{FeatureRule, ENERGY_RULE, GENRE_TABLE, TEMPO_RULE, VALENCE_RULE};
use crate::seed::{FeatureTarget, SeedSpec, MAX_SEED_GENRES};

/// Trims and lower-cases keywords, dropping empty ones. Order is kept.
pub fn normalize_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Derives the catalog query for a keyword list.
///
/// Genres follow keyword order; audio features do not depend on order.
pub fn derive_seed_spec<S: AsRef<str>>(keywords: &[S]) -> SeedSpec {
    let keywords = normalize_keywords(keywords);

    SeedSpec {
        genres: extract_genres(&keywords),
        energy: match_feature(&keywords, &ENERGY_RULE),
        valence: match_feature(&keywords, &VALENCE_RULE),
        tempo: match_feature(&keywords, &TEMPO_RULE),
    }
}

/// For each keyword, the first table entry it contains contributes its
/// genre unless already present.
fn extract_genres(keywords: &[String]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();

    for keyword in keywords {
        if genres.len() >= MAX_SEED_GENRES {
            break;
        }
        let matched = GENRE_TABLE
            .iter()
            .find(|(fragment, _)| keyword.contains(fragment));
        if let Some((_, genre)) = matched {
            if !genres.iter().any(|g| g == genre) {
                genres.push((*genre).to_string());
            }
        }
    }

    genres
}

/// High set first: a request matching both sides gets the high target.
fn match_feature(keywords: &[String], rule: &FeatureRule) -> Option<FeatureTarget> {
    let hits = |set: &[&str]| keywords.iter().any(|k| set.contains(&k.as_str()));

    if hits(rule.high) {
        Some(rule.high_target)
    } else if hits(rule.low) {
        Some(rule.low_target)
    } else {
        None
    }
}
