//! Stable cache keys.
//!
//! Keys are the first 128 bits of a SHA-256 digest rendered as lowercase
//! hex, so they are identical across process restarts.

use sha2::{Digest, Sha256};

use crate::seed::normalize_keywords;

const KEYWORD_DELIMITER: &str = ",";

/// Cache key for a keyword set. Order and duplicates do not matter.
pub fn keyword_cache_key<S: AsRef<str>>(keywords: &[S]) -> String {
    let mut keywords = normalize_keywords(keywords);
    keywords.sort();
    keywords.dedup();
    digest_128(&keywords.join(KEYWORD_DELIMITER))
}

/// Cache key for a raw user message.
pub fn message_cache_key(message: &str) -> String {
    digest_128(message.trim())
}

fn digest_128(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}
