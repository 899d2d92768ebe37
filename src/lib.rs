//! DreamEcho - podcast feed backend
//!
//! Issues session tokens, fetches and caches RSS/Atom podcast feeds, and
//! proxies audio enclosures for browser clients.

pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod proxy;
pub mod ssrf;
pub mod subscription;
pub mod web;

pub use auth::{Claims, TokenError, TokenIssuer, TOKEN_TTL_SECS};
pub use config::Config;
pub use error::{DreamEchoError, Result};
pub use feed::{
    FeedCache, FeedDocument, FeedItem, FeedService, FeedSource, HttpFeedSource, ParsedFeed,
    ParsedItem,
};
pub use proxy::AudioProxy;
pub use subscription::SubscriptionStore;
pub use web::{create_router, AppState, WebServer};
