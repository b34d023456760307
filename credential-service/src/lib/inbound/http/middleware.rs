use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Middleware that validates bearer tokens and adds the identity to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let verified = state.user_service.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token rejected");
        unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        email: verified.email,
        expires_at: verified.expires_at,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
    })
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}
