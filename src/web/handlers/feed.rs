//! Feed handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::feed::FeedDocument;
use crate::web::dto::UrlQuery;
use crate::web::error::ApiError;

/// GET /api/feed?url=U - Fetch a feed by query parameter.
pub async fn feed_by_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<FeedDocument>, ApiError> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("url parameter required"))?;

    fetch(&state, &url).await
}

/// GET /api/feed/{url} - Fetch a feed by (percent-encoded) path.
pub async fn feed_by_path(
    State(state): State<Arc<AppState>>,
    Path(url): Path<String>,
) -> Result<Json<FeedDocument>, ApiError> {
    fetch(&state, &url).await
}

async fn fetch(state: &AppState, url: &str) -> Result<Json<FeedDocument>, ApiError> {
    check_url_format(url)?;
    let document = state.feeds.fetch(url).await?;
    Ok(Json(document))
}

/// Feed URLs must start with `http://` or `https://`.
pub fn check_url_format(url: &str) -> Result<(), ApiError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ApiError::bad_request("invalid URL format"))
    }
}
