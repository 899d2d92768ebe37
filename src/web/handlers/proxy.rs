//! Audio proxy handler.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{ACCEPT_RANGES, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE},
        HeaderMap, HeaderValue,
    },
    response::Response,
};
use std::sync::Arc;

use super::AppState;
use crate::proxy::DEFAULT_AUDIO_CONTENT_TYPE;
use crate::web::dto::UrlQuery;
use crate::web::error::ApiError;

/// GET /api/proxy/audio?url=U - Stream upstream audio to the browser.
pub async fn proxy_audio(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("url parameter required"))?;

    let upstream = state.proxy.open(&url, headers.get(RANGE)).await?;

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_AUDIO_CONTENT_TYPE));

    let mut builder = Response::builder()
        .status(upstream.status())
        .header(CONTENT_TYPE, content_type)
        .header(CACHE_CONTROL, state.proxy.cache_control());

    for name in [CONTENT_LENGTH, CONTENT_RANGE, ACCEPT_RANGES] {
        if let Some(value) = upstream.headers().get(&name) {
            builder = builder.header(name, value.clone());
        }
    }

    tracing::debug!(url = %url, status = %upstream.status(), "Proxying audio");

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| {
            tracing::error!("Failed to build proxy response: {}", e);
            ApiError::internal("Failed to build response")
        })
}
