use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::IssuedToken;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError> {
    state
        .user_service
        .authenticate(&body.email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|issued| ApiSuccess::new(StatusCode::OK, issued.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for AuthenticateResponseData {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}
