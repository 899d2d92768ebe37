//! Normalization of parsed feeds into the client-facing document shape.

use crate::feed::types::{FeedDocument, FeedItem, ParsedFeed, ParsedItem};

/// Convert a parsed feed into a [`FeedDocument`].
///
/// Only the first enclosure of an item is used as its audio. Items without
/// an extension image inherit the feed-level image.
pub fn normalize(feed: ParsedFeed) -> FeedDocument {
    let image = feed.image.unwrap_or_default();

    let items = feed
        .items
        .into_iter()
        .map(|item| normalize_item(item, &image))
        .collect();

    FeedDocument {
        title: feed.title,
        description: feed.description,
        author: feed.author.unwrap_or_default(),
        link: feed.link,
        image,
        items,
    }
}

fn normalize_item(item: ParsedItem, feed_image: &str) -> FeedItem {
    let audio_url = item
        .enclosures
        .into_iter()
        .next()
        .map(|enclosure| enclosure.url)
        .unwrap_or_default();

    let (image, duration) = match item.extension {
        Some(ext) => {
            let image = if ext.image.is_empty() {
                feed_image.to_string()
            } else {
                ext.image
            };
            (image, ext.duration)
        }
        None => (feed_image.to_string(), String::new()),
    };

    FeedItem {
        title: item.title,
        description: item.description,
        audio_url,
        pub_date: item.published,
        duration,
        image,
    }
}
