//! Subscription handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{AddSubscriptionRequest, SubscriptionsResponse, SuccessResponse, ValidatedJson};
use crate::web::middleware::AuthUser;

/// GET /api/subscriptions - List the caller's subscriptions.
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Json<SubscriptionsResponse> {
    Json(SubscriptionsResponse {
        subscriptions: state.subscriptions.list(&claims.user_id),
    })
}

/// POST /api/subscriptions - Subscribe to a feed URL.
pub async fn add_subscription(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<AddSubscriptionRequest>,
) -> Json<SuccessResponse> {
    let url = req.url.trim();
    state.subscriptions.add(&claims.user_id, url);
    tracing::info!(user_id = %claims.user_id, url = %url, "Subscribed");
    Json(SuccessResponse::ok())
}

/// DELETE /api/subscriptions/{url} - Unsubscribe. Idempotent.
pub async fn remove_subscription(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(url): Path<String>,
) -> Json<SuccessResponse> {
    if state.subscriptions.remove(&claims.user_id, &url) {
        tracing::info!(user_id = %claims.user_id, url = %url, "Unsubscribed");
    }
    Json(SuccessResponse::ok())
}
