//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{LoginRequest, LoginResponse, ProfileResponse, UserInfo, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/login - Issue a session token.
///
/// Any non-empty username/password pair is accepted.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_id = uuid::Uuid::new_v4().simple().to_string();

    let token = state.tokens.issue(&user_id, &req.username).map_err(|e| {
        tracing::error!("Failed to sign token: {}", e);
        ApiError::internal("Failed to generate token")
    })?;

    tracing::info!(user_id = %user_id, username = %req.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: req.username,
        },
    }))
}

/// GET /api/profile - Claims of the token bearer.
pub async fn profile(AuthUser(claims): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(claims))
}
