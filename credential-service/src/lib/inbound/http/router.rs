use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::calculate_repayments::calculate_repayments;
use super::handlers::current_user::current_user;
use super::handlers::register_user::register_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::JsonFileUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<JsonFileUserRepository>>,
}

pub fn create_router(user_service: Arc<UserService<JsonFileUserRepository>>) -> Router {
    let state = AppState { user_service };

    let public_routes = Router::new()
        .route("/api/auth/login", post(authenticate))
        .route("/api/users", post(register_user))
        .route("/api/mortgage/repayments", post(calculate_repayments));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
