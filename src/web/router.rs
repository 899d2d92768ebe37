//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_subscription, feed_by_path, feed_by_query, health, list_subscriptions, login,
    no_content, profile, proxy_audio, remove_subscription, route_not_found, AppState,
};
use super::middleware::{create_cors_layer, preflight_no_content, token_auth};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/login", post(login))
        .route("/feed", get(feed_by_query))
        .route("/feed/*url", get(feed_by_path))
        .route("/proxy/audio", get(proxy_audio))
        .route("/health", get(health));

    // Routes requiring a bearer token
    let protected_routes = Router::new()
        .route("/profile", get(profile))
        .route(
            "/subscriptions",
            get(list_subscriptions).post(add_subscription),
        )
        .route(
            "/subscriptions/*url",
            axum::routing::delete(remove_subscription),
        );

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    let issuer = app_state.tokens.clone();

    Router::new()
        .nest("/api", api_routes)
        .route("/favicon.ico", get(no_content))
        .route("/apple-touch-icon.png", get(no_content))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(preflight_no_content))
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    token_auth(issuer.clone(), req, next)
                })),
        )
        .with_state(app_state)
}
