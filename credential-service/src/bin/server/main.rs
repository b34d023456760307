use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use credential_service::config::Config;
use credential_service::domain::user::service::UserService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::JsonFileUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "credential-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage_path = %config.storage.path.display(),
        token_lifetime_seconds = config.jwt.expiration_seconds,
        work_factor = config.password.work_factor,
        "Configuration loaded"
    );

    let authenticator = Authenticator::new(config.jwt.secret.as_bytes())?
        .with_password_hasher(PasswordHasher::with_work_factor(config.password.work_factor)?)
        .with_token_lifetime(chrono::Duration::seconds(config.jwt.expiration_seconds));

    let user_repository = Arc::new(JsonFileUserRepository::open(&config.storage.path).await?);
    let user_service = Arc::new(UserService::new(user_repository, Arc::new(authenticator)));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, create_router(user_service)).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
