use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::ExtraFields;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserRecord;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<ApiSuccess<RegisterUserResponseData>, ApiError> {
    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registration (raw JSON); unknown keys are kept
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterUserRequest {
    email: String,
    password: String,
    #[serde(flatten)]
    extra: ExtraFields,
}

impl RegisterUserRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, UserError> {
        let password = Password::new(self.password)?;
        Ok(RegisterUserCommand::new(self.email, password, self.extra))
    }
}

/// Registered user as returned to the client; the hash is never echoed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterUserResponseData {
    pub email: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl From<&UserRecord> for RegisterUserResponseData {
    fn from(user: &UserRecord) -> Self {
        Self {
            email: user.email.clone(),
            extra: user.extra.clone(),
        }
    }
}
