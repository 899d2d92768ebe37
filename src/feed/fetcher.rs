//! Feed retrieval and parsing.
//!
//! [`FeedSource`] is the seam between the fetch orchestration and the
//! network. [`HttpFeedSource`] downloads feeds with `reqwest` under SSRF
//! checks and resource limits, then parses them with `feed-rs`.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;

use crate::config::FeedConfig;
use crate::error::{DreamEchoError, Result};
use crate::feed::types::{Enclosure, ParsedFeed, ParsedItem, PlatformExtension, USER_AGENT};
use crate::ssrf::{guard_client, validate_url_resolved};

/// Retrieves and parses a feed by URL.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed at `url`.
    async fn fetch(&self, url: &str) -> Result<ParsedFeed>;
}

/// Feed source backed by HTTP and feed-rs.
pub struct HttpFeedSource {
    client: Client,
    max_feed_size: u64,
    block_private_hosts: bool,
}

impl HttpFeedSource {
    /// Create a feed source from configuration.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .user_agent(USER_AGENT);
        let client = guard_client(builder, config.max_redirects, config.block_private_hosts)
            .build()
            .map_err(|e| DreamEchoError::Feed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
            block_private_hosts: config.block_private_hosts,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        if self.block_private_hosts {
            validate_url_resolved(url).await?;
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DreamEchoError::Timeout(format!("feed request to {} timed out", url))
            } else {
                DreamEchoError::Feed(format!("failed to fetch feed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(DreamEchoError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(DreamEchoError::Feed(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DreamEchoError::Feed(format!("failed to read response: {}", e)))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(DreamEchoError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        parse_feed(&bytes)
    }
}

/// Parse feed bytes into a [`ParsedFeed`].
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| DreamEchoError::Feed(format!("failed to parse feed: {}", e)))?;

    let image = feed
        .logo
        .map(|logo| logo.uri)
        .or_else(|| feed.icon.map(|icon| icon.uri))
        .filter(|uri| !uri.is_empty());

    let author = feed
        .authors
        .into_iter()
        .next()
        .map(|person| person.name)
        .filter(|name| !name.is_empty());

    let items = feed.entries.into_iter().map(parse_entry).collect();

    Ok(ParsedFeed {
        title: feed.title.map(|t| t.content).unwrap_or_default(),
        description: feed.description.map(|d| d.content).unwrap_or_default(),
        link: feed.links.into_iter().next().map(|l| l.href).unwrap_or_default(),
        image,
        author,
        items,
    })
}

fn parse_entry(entry: feed_rs::model::Entry) -> ParsedItem {
    let enclosures = entry
        .media
        .iter()
        .flat_map(|media| media.content.iter())
        .filter_map(|content| {
            content.url.as_ref().map(|url| Enclosure {
                url: url.to_string(),
                mime_type: content.content_type.as_ref().map(|m| m.to_string()),
                length: content.size,
            })
        })
        .collect();

    let image = entry
        .media
        .iter()
        .flat_map(|media| media.thumbnails.iter())
        .map(|thumbnail| thumbnail.image.uri.clone())
        .find(|uri| !uri.is_empty())
        .unwrap_or_default();

    let duration = entry
        .media
        .iter()
        .find_map(|media| {
            media
                .duration
                .or_else(|| media.content.iter().find_map(|c| c.duration))
        })
        .map(format_duration)
        .unwrap_or_default();

    let extension = if image.is_empty() && duration.is_empty() {
        None
    } else {
        Some(PlatformExtension { image, duration })
    };

    ParsedItem {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        description: entry
            .summary
            .map(|t| t.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default(),
        published: entry
            .published
            .or(entry.updated)
            .map(|d| d.to_rfc2822())
            .unwrap_or_default(),
        enclosures,
        extension,
    }
}

/// Render a duration as `H:MM:SS`, or `M:SS` when under an hour.
fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
