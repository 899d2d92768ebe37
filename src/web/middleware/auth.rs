//! Bearer token authentication.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::{Claims, TokenIssuer};
use crate::web::error::ApiError;

/// Extractor for authenticated users.
///
/// Requires `Authorization: Bearer <token>` and yields the verified claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let header = parts
                .headers
                .get(AUTHORIZATION)
                .ok_or_else(|| ApiError::unauthorized("authorization header required"))?;

            let header = header
                .to_str()
                .map_err(|_| ApiError::unauthorized("invalid authorization header format"))?;
            let token = bearer_token(header)
                .ok_or_else(|| ApiError::unauthorized("invalid authorization header format"))?;

            // Injected by `token_auth`
            let issuer = parts
                .extensions
                .get::<TokenIssuer>()
                .ok_or_else(|| ApiError::internal("token issuer not configured"))?;

            let claims = issuer.verify(token).map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                ApiError::unauthorized("invalid token")
            })?;

            Ok(AuthUser(claims))
        })
    }
}

/// Split an `Authorization` value on its first space and return the token
/// when the scheme is `Bearer`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if scheme != "Bearer" || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Middleware function to inject the token issuer into request extensions.
pub async fn token_auth(issuer: TokenIssuer, mut request: Request<Body>, next: Next) -> Response {
    request.extensions_mut().insert(issuer);
    next.run(request).await
}
