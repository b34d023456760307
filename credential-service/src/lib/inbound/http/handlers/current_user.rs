use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Echo the identity carried by the caller's bearer token.
pub async fn current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<CurrentUserResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        CurrentUserResponseData {
            email: user.email,
            expires_at: user.expires_at,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}
