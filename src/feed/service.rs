//! Feed fetch orchestration: cache first, then fetch, normalize and store.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{DreamEchoError, Result};
use crate::feed::cache::FeedCache;
use crate::feed::fetcher::FeedSource;
use crate::feed::normalize::normalize;
use crate::feed::types::FeedDocument;

/// Produces feed documents, preferring fresh cache entries.
#[derive(Clone)]
pub struct FeedService {
    source: Arc<dyn FeedSource>,
    cache: Arc<FeedCache>,
    fetch_timeout: Duration,
}

impl FeedService {
    /// Create a new feed service.
    pub fn new(source: Arc<dyn FeedSource>, cache: Arc<FeedCache>, fetch_timeout: Duration) -> Self {
        Self {
            source,
            cache,
            fetch_timeout,
        }
    }

    /// The cache backing this service.
    pub fn cache(&self) -> &Arc<FeedCache> {
        &self.cache
    }

    /// Return the feed at `url`.
    ///
    /// A fresh cache entry is returned without touching the network.
    /// Failures are never cached; the previous entry, if any, is kept.
    pub async fn fetch(&self, url: &str) -> Result<FeedDocument> {
        if let Some(document) = self.cache.lookup(url) {
            tracing::debug!(url = %url, "Feed cache hit");
            return Ok(document);
        }

        tracing::debug!(url = %url, "Feed cache miss, fetching");

        let parsed = tokio::time::timeout(self.fetch_timeout, self.source.fetch(url))
            .await
            .map_err(|_| {
                DreamEchoError::Timeout(format!(
                    "feed fetch exceeded {} seconds",
                    self.fetch_timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "Feed fetch failed");
                e
            })?;

        let document = normalize(parsed);
        self.cache.store(url, document.clone());

        tracing::info!(url = %url, items = document.items.len(), "Fetched feed");
        Ok(document)
    }
}
