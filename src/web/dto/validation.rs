//! Body extraction with `validator` rules applied.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::web::error::ApiError;

/// JSON body that has passed its `Validate` rules.
///
/// Unreadable bodies and rule failures both become 400 responses; rule
/// failures carry per-field details.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => body,
            Err(rejection) => return Err(body_rejected(&rejection)),
        };
        body.validate().map_err(ApiError::from_validation_errors)?;
        Ok(Self(body))
    }
}

fn body_rejected(rejection: &JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Request body rejected");
    ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
}

/// Rejects strings that are blank once surrounding whitespace is removed.
pub fn not_empty_trimmed(value: &str) -> Result<(), ValidationError> {
    match value.trim() {
        "" => Err(ValidationError::new("not_empty_trimmed").with_message("Must not be empty".into())),
        _ => Ok(()),
    }
}
