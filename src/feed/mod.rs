//! Podcast feed module for DreamEcho.
//!
//! This module fetches RSS/Atom feeds, normalizes them into
//! [`FeedDocument`]s and caches the result per feed URL.

pub mod cache;
pub mod fetcher;
pub mod normalize;
pub mod service;
pub mod types;

pub use cache::{FeedCache, DEFAULT_CACHE_TTL, DEFAULT_MAX_ENTRIES};
pub use fetcher::{parse_feed, FeedSource, HttpFeedSource};
pub use normalize::normalize;
pub use service::FeedService;
pub use types::{
    Enclosure, FeedDocument, FeedItem, ParsedFeed, ParsedItem, PlatformExtension, USER_AGENT,
};
