//! Track model returned by the recommendation catalog.

use serde::Serialize;

/// A recommended track.
///
/// Tracks are immutable once built and only come from [`Track::new`], so
/// popularity is always within 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    title: String,
    artist: String,
    album: String,
    external_url: String,
    popularity: u8,
    duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_date: Option<String>,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        external_url: impl Into<String>,
        popularity: u32,
        duration_ms: u64,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            external_url: external_url.into(),
            popularity: popularity.min(100) as u8,
            duration_ms,
            preview_url: None,
            release_date: None,
        }
    }

    #[must_use]
    pub fn with_preview_url(mut self, url: Option<String>) -> Self {
        self.preview_url = url;
        self
    }

    #[must_use]
    pub fn with_release_date(mut self, date: Option<String>) -> Self {
        self.release_date = date;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn external_url(&self) -> &str {
        &self.external_url
    }

    pub fn popularity(&self) -> u8 {
        self.popularity
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    pub fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref()
    }
}
