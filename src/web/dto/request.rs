//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::not_empty_trimmed;

/// Login request.
///
/// Both fields must be present and non-empty; no credential check is made
/// and the username is otherwise taken as given.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Add subscription request.
#[derive(Debug, Deserialize, Validate)]
pub struct AddSubscriptionRequest {
    /// Feed URL to subscribe to.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub url: String,
}

/// Query parameters carrying a target URL (`?url=...`).
#[derive(Debug, Default, Deserialize)]
pub struct UrlQuery {
    /// Target URL.
    #[serde(default)]
    pub url: Option<String>,
}
