//! Audio proxy client.
//!
//! Opens upstream audio enclosures so the web layer can stream them back to
//! browsers that cannot fetch them cross-origin.

use std::time::Duration;

use reqwest::header::{HeaderValue, RANGE};
use reqwest::{Client, Response, StatusCode};

use crate::config::ProxyConfig;
use crate::error::{DreamEchoError, Result};
use crate::feed::USER_AGENT;
use crate::ssrf::{guard_client, parse_http_url, validate_url_resolved};

/// Content type assumed when the upstream does not send one.
pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// HTTP client for upstream audio.
#[derive(Clone)]
pub struct AudioProxy {
    client: Client,
    block_private_hosts: bool,
    cache_max_age_secs: u64,
}

impl AudioProxy {
    /// Create a proxy client from configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        // No overall timeout: episodes stream for as long as the listener plays.
        let builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(USER_AGENT)
            .no_gzip()
            .no_deflate();
        let client = guard_client(builder, config.max_redirects, config.block_private_hosts)
            .build()
            .map_err(|e| DreamEchoError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            block_private_hosts: config.block_private_hosts,
            cache_max_age_secs: config.cache_max_age_secs,
        })
    }

    /// `Cache-Control` value for proxied responses.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age_secs)
    }

    /// Open the audio at `url`, forwarding the client's `Range` header.
    ///
    /// Only 200 and 206 upstream answers are accepted.
    pub async fn open(&self, url: &str, range: Option<&HeaderValue>) -> Result<Response> {
        if self.block_private_hosts {
            validate_url_resolved(url).await?;
        } else {
            parse_http_url(url)?;
        }

        let mut request = self.client.get(url);
        if let Some(range) = range {
            request = request.header(RANGE, range.clone());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DreamEchoError::Timeout(format!("audio request to {} timed out", url))
            } else {
                DreamEchoError::Upstream(format!("failed to fetch audio: {}", e))
            }
        })?;

        match response.status() {
            StatusCode::OK | StatusCode::PARTIAL_CONTENT => Ok(response),
            status => {
                tracing::warn!(url = %url, status = %status, "Audio upstream returned error");
                Err(DreamEchoError::Upstream(format!(
                    "audio source returned status {}",
                    status
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_control() {
        let proxy = AudioProxy::new(&ProxyConfig::default()).unwrap();
        assert_eq!(proxy.cache_control(), "public, max-age=3600");
    }

    #[tokio::test]
    async fn test_open_rejects_private_host() {
        let proxy = AudioProxy::new(&ProxyConfig::default()).unwrap();
        let result = proxy.open("http://127.0.0.1/a.mp3", None).await;
        assert!(matches!(result, Err(DreamEchoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_open_rejects_scheme_without_blocking() {
        let config = ProxyConfig {
            block_private_hosts: false,
            ..Default::default()
        };
        let proxy = AudioProxy::new(&config).unwrap();
        let result = proxy.open("file:///etc/passwd", None).await;
        assert!(matches!(result, Err(DreamEchoError::Validation(_))));
    }
}
