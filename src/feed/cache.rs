//! In-memory feed cache with lazy freshness checks.
//!
//! Entries are keyed by the feed URL exactly as requested. A document is
//! served only while `now - fetched_at < ttl`; stale entries stay in the
//! table until they are overwritten, swept, or evicted to make room.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::feed::types::FeedDocument;

/// Default freshness window (24 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default maximum number of cached feeds.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
struct CacheEntry {
    document: FeedDocument,
    fetched_at: DateTime<Utc>,
}

/// Thread-safe feed cache.
#[derive(Debug)]
pub struct FeedCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl FeedCache {
    /// Create a cache with the given freshness window and capacity.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Return the cached document for `url` if it is still fresh.
    pub fn lookup(&self, url: &str) -> Option<FeedDocument> {
        self.lookup_at(url, Utc::now())
    }

    /// Return the cached document for `url` if it is fresh at `now`.
    pub fn lookup_at(&self, url: &str, now: DateTime<Utc>) -> Option<FeedDocument> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(url)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.document.clone())
    }

    /// Store a document for `url`, replacing any previous entry.
    pub fn store(&self, url: &str, document: FeedDocument) {
        self.store_at(url, document, Utc::now());
    }

    /// Store a document for `url` with an explicit fetch time.
    pub fn store_at(&self, url: &str, document: FeedDocument, fetched_at: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if !entries.contains_key(url) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                tracing::debug!(url = %key, "Evicting oldest cached feed");
                entries.remove(&key);
            }
        }

        entries.insert(
            url.to_string(),
            CacheEntry {
                document,
                fetched_at,
            },
        );
    }

    /// Remove every stale entry. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Remove every entry that is stale at `now`. Returns the number removed.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        before - entries.len()
    }

    /// Number of entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a background task that sweeps stale entries periodically.
    pub fn start_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);

            // Skip the first immediate tick
            timer.tick().await;

            loop {
                timer.tick().await;

                let removed = self.sweep();
                if removed > 0 {
                    tracing::info!(removed_count = removed, "Swept stale feeds from cache");
                } else {
                    tracing::debug!("No stale feeds to sweep");
                }
            }
        })
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        match (now - entry.fetched_at).to_std() {
            Ok(elapsed) => elapsed < self.ttl,
            // Fetch time is in the future (clock stepped back).
            Err(_) => true,
        }
    }
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, DEFAULT_MAX_ENTRIES)
    }
}
