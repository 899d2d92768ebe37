//! Feed types for DreamEcho.

use serde::{Deserialize, Serialize};

/// User agent string for feed fetching and audio proxying.
pub const USER_AGENT: &str = concat!("DreamEcho/", env!("CARGO_PKG_VERSION"), " (Podcast Reader)");

/// A podcast/RSS feed in its canonical, client-facing shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDocument {
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: String,
    /// Feed-level image URL (may be empty).
    pub image: String,
    /// Author name (may be empty).
    pub author: String,
    /// Canonical link of the feed's website.
    pub link: String,
    /// Entries in source order.
    pub items: Vec<FeedItem>,
}

/// One entry of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Item title.
    pub title: String,
    /// Item description.
    pub description: String,
    /// URL of the playable enclosure, empty when there is none.
    pub audio_url: String,
    /// Publication date, rendered as RFC 2822 in UTC.
    ///
    /// The parser only keeps the parsed instant, so a feed's original text
    /// and offset are not preserved: `Tue, 02 Jan 2024 08:00:00 +0800`
    /// comes back as `Tue, 2 Jan 2024 00:00:00 +0000`.
    pub pub_date: String,
    /// Duration, empty when unknown.
    pub duration: String,
    /// Item image, falling back to the feed image.
    pub image: String,
}

/// Feed as produced by the parsing collaborator, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: String,
    /// Feed-level image URL, if the feed declares one.
    pub image: Option<String>,
    /// Structured author name, if the feed declares one.
    pub author: Option<String>,
    /// Website link.
    pub link: String,
    /// Entries in source order.
    pub items: Vec<ParsedItem>,
}

/// Entry as produced by the parsing collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedItem {
    /// Item title.
    pub title: String,
    /// Item description.
    pub description: String,
    /// Attached media, in document order.
    pub enclosures: Vec<Enclosure>,
    /// Raw published date string.
    pub published: String,
    /// Podcast platform extension data (iTunes-style), if present.
    pub extension: Option<PlatformExtension>,
}

/// Media attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    /// Media URL.
    pub url: String,
    /// MIME type, if declared.
    pub mime_type: Option<String>,
    /// Length in bytes, if declared.
    pub length: Option<u64>,
}

impl Enclosure {
    /// Create an enclosure with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime_type: None,
            length: None,
        }
    }
}

/// Supplemental per-item metadata from podcast platform extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformExtension {
    /// Item image URL (may be empty).
    pub image: String,
    /// Duration (may be empty).
    pub duration: String,
}
