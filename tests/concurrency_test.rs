//! Concurrency tests for DreamEcho.
//!
//! These tests verify that the shared feed cache and subscription table
//! stay consistent under parallel access.

mod common;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::AUTHORIZATION;
use common::{create_test_server, login_token, FakeFeedSource};
use dreamecho::feed::{FeedCache, FeedDocument, FeedService};
use dreamecho::SubscriptionStore;
use futures::future::join_all;
use serde_json::{json, Value};

/// Parallel stores for distinct and identical keys from many tasks.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cache_stores() {
    let cache = Arc::new(FeedCache::new(Duration::from_secs(3600), 1000));

    const NUM_TASKS: usize = 32;

    let mut handles = Vec::new();
    for i in 0..NUM_TASKS {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            let document = FeedDocument {
                title: format!("writer {i}"),
                ..Default::default()
            };
            cache.store(&format!("https://example.com/{i}"), document.clone());
            cache.store("https://example.com/shared", document);
            cache.lookup("https://example.com/shared")
        }));
    }

    for handle in handles {
        // Every reader sees some complete document
        let seen = handle.await.unwrap().unwrap();
        assert!(seen.title.starts_with("writer "));
    }

    assert_eq!(cache.len(), NUM_TASKS + 1);
    for i in 0..NUM_TASKS {
        let document = cache.lookup(&format!("https://example.com/{i}")).unwrap();
        assert_eq!(document.title, format!("writer {i}"));
    }
}

/// Parallel fetches through the service all succeed and leave one entry per URL.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_service_fetches() {
    let source = Arc::new(FakeFeedSource::new());
    source.set_delay(Duration::from_millis(20));
    let service = FeedService::new(
        source.clone(),
        Arc::new(FeedCache::default()),
        Duration::from_secs(5),
    );

    let urls: Vec<String> = (0..4)
        .map(|i| format!("https://example.com/feed{i}.xml"))
        .collect();

    let mut handles = Vec::new();
    for _ in 0..5 {
        for url in &urls {
            let service = service.clone();
            let url = url.clone();
            handles.push(tokio::spawn(async move { service.fetch(&url).await }));
        }
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(service.cache().len(), urls.len());
    // Concurrent misses may each fetch, but never more than once per request
    assert!(source.total_calls() >= urls.len());
    assert!(source.total_calls() <= 20);
}

/// Parallel HTTP requests against the router.
#[tokio::test]
async fn test_concurrent_feed_requests() {
    let (server, source) = create_test_server();

    let responses = join_all((0..10).map(|i| {
        server
            .get("/api/feed")
            .add_query_param("url", format!("https://example.com/{}.xml", i % 3))
            .into_future()
    }))
    .await;

    for response in responses {
        response.assert_status_ok();
        assert!(!response.json::<Value>()["title"]
            .as_str()
            .unwrap()
            .is_empty());
    }
    assert!(source.total_calls() >= 3);
}

/// Parallel subscription writers for one user.
#[tokio::test]
async fn test_concurrent_subscriptions() {
    let (server, _) = create_test_server();
    let token = login_token(&server, "alice").await;
    let auth = format!("Bearer {}", token);

    let responses = join_all((0..10).map(|i| {
        server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, auth.clone())
            .json(&json!({ "url": format!("https://example.com/{i}.xml") }))
            .into_future()
    }))
    .await;

    for response in responses {
        response.assert_status_ok();
    }

    let response = server
        .get("/api/subscriptions")
        .add_header(AUTHORIZATION, auth)
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["subscriptions"].as_object().unwrap().len(), 10);
}

/// Store-level writers from OS threads.
#[test]
fn test_subscription_store_threads() {
    let store = Arc::new(SubscriptionStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for j in 0..50 {
                    store.add("u1", &format!("https://example.com/{i}/{j}"));
                }
                for j in 0..25 {
                    assert!(store.remove("u1", &format!("https://example.com/{i}/{j}")));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.list("u1").len(), 8 * 25);
}
