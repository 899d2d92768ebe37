//! API handlers.

pub mod auth;
pub mod feed;
pub mod health;
pub mod proxy;
pub mod subscription;

pub use auth::*;
pub use feed::*;
pub use health::*;
pub use proxy::*;
pub use subscription::*;

use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::error::Result;
use crate::feed::{FeedCache, FeedService, FeedSource, HttpFeedSource};
use crate::proxy::AudioProxy;
use crate::subscription::SubscriptionStore;

/// Application state shared across handlers.
pub struct AppState {
    /// Session token issuer, keyed for this process only.
    pub tokens: TokenIssuer,
    /// Cached feed retrieval.
    pub feeds: FeedService,
    /// Per-user subscriptions.
    pub subscriptions: SubscriptionStore,
    /// Upstream audio client.
    pub proxy: AudioProxy,
}

impl AppState {
    /// Create the application state with the HTTP feed source.
    pub fn new(config: &Config) -> Result<Self> {
        let source = Arc::new(HttpFeedSource::new(&config.feed)?);
        Self::with_feed_source(config, source)
    }

    /// Create the application state around a specific feed source.
    pub fn with_feed_source(config: &Config, source: Arc<dyn FeedSource>) -> Result<Self> {
        let cache = Arc::new(FeedCache::new(
            config.feed.cache_ttl(),
            config.feed.cache_max_entries,
        ));

        Ok(Self {
            tokens: TokenIssuer::new(),
            feeds: FeedService::new(source, cache, config.feed.total_timeout()),
            subscriptions: SubscriptionStore::new(),
            proxy: AudioProxy::new(&config.proxy)?,
        })
    }
}
