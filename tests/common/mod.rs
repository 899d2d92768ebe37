//! Test helpers for the HTTP API tests.
//!
//! Provides a counting fake feed source and TestServer builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use dreamecho::config::Config;
use dreamecho::feed::{Enclosure, FeedSource, ParsedFeed, ParsedItem, PlatformExtension};
use dreamecho::web::{create_router, AppState};
use dreamecho::{DreamEchoError, Result};

/// Feed source that serves canned feeds and counts calls per URL.
#[derive(Default)]
pub struct FakeFeedSource {
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Duration>,
}

impl FakeFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fetches made for `url`.
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Number of fetches made overall.
    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Make every following fetch fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay every following fetch.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl FeedSource for FakeFeedSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.entry(url.to_string()).or_insert(0);
            *n += 1;
            *n
        };
        self.total.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(DreamEchoError::Feed("upstream unreachable".to_string()));
        }

        Ok(sample_feed(url, n))
    }
}

/// A two-episode podcast; the title carries the fetch number.
pub fn sample_feed(url: &str, fetch_number: usize) -> ParsedFeed {
    ParsedFeed {
        title: format!("Podcast #{fetch_number}"),
        description: format!("Feed at {url}"),
        image: Some("https://cdn.example.com/cover.jpg".to_string()),
        author: Some("Host".to_string()),
        link: "https://example.com".to_string(),
        items: vec![
            ParsedItem {
                title: "Episode 2".to_string(),
                description: "Second".to_string(),
                enclosures: vec![Enclosure::new("https://cdn.example.com/ep2.mp3")],
                published: "Tue, 02 Jan 2024 00:00:00 +0000".to_string(),
                extension: Some(PlatformExtension {
                    image: "https://cdn.example.com/ep2.jpg".to_string(),
                    duration: "42:10".to_string(),
                }),
            },
            ParsedItem {
                title: "Episode 1".to_string(),
                description: "First".to_string(),
                enclosures: vec![],
                published: "Mon, 01 Jan 2024 00:00:00 +0000".to_string(),
                extension: None,
            },
        ],
    }
}

/// Configuration for tests: private hosts allowed so local upstreams work.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.feed.block_private_hosts = false;
    config.proxy.block_private_hosts = false;
    config
}

/// Create a test server around a fake feed source.
pub fn create_test_server_with(config: &Config) -> (TestServer, Arc<FakeFeedSource>) {
    let source = Arc::new(FakeFeedSource::new());
    let state = AppState::with_feed_source(config, source.clone())
        .expect("Failed to create app state");
    let router = create_router(Arc::new(state), &config.server.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, source)
}

/// Create a test server around a fake feed source with default settings.
pub fn create_test_server() -> (TestServer, Arc<FakeFeedSource>) {
    create_test_server_with(&create_test_config())
}

/// Create a test server with the real HTTP feed source.
pub fn create_http_test_server() -> TestServer {
    let config = create_test_config();
    let state = AppState::new(&config).expect("Failed to create app state");
    let router = create_router(Arc::new(state), &config.server.cors_origins);
    TestServer::new(router).expect("Failed to create test server")
}

/// Log in and return the response body.
pub async fn login(server: &TestServer, username: &str, password: &str) -> Value {
    let response = server
        .post("/api/login")
        .json(&json!({
            "username": username,
            "password": password
        }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}

/// Log in and return only the token.
pub async fn login_token(server: &TestServer, username: &str) -> String {
    login(server, username, "secret").await["token"]
        .as_str()
        .expect("token missing")
        .to_string()
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
