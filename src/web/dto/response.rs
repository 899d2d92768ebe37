//! Response DTOs for Web API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::auth::Claims;

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed session token.
    pub token: String,
    /// The logged-in user.
    pub user: UserInfo,
}

/// Public user information.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: String,
    /// Username.
    pub username: String,
}

/// Profile of the token bearer.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// User ID.
    pub user_id: String,
    /// Username.
    pub username: String,
}

impl From<Claims> for ProfileResponse {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Subscription membership map.
#[derive(Debug, Serialize)]
pub struct SubscriptionsResponse {
    /// Subscribed URL to `true`.
    pub subscriptions: BTreeMap<String, bool>,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    /// Create a successful acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Current time (RFC 3339).
    pub timestamp: String,
    /// Crate version.
    pub version: &'static str,
}
