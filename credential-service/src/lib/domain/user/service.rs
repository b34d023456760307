use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::JwtError;
use tokio::sync::Mutex;

use crate::domain::user::models::IssuedToken;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserRecord;
use crate::domain::user::models::VerifiedToken;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for credential operations.
///
/// Hashing and verification run on the blocking pool. Registration holds a
/// lock across the duplicate check and the insert, so two concurrent
/// registrations of the same email cannot both succeed.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    registration_lock: Mutex<()>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Opened user store handle
    /// * `authenticator` - Password hasher and token signer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            registration_lock: Mutex::new(()),
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| UserError::Hashing(e.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<UserRecord, UserError> {
        let RegisterUserCommand {
            email,
            password,
            extra,
        } = command;

        let password_hash = self.hash_password(password).await?;

        let _guard = self.registration_lock.lock().await;

        if self.repository.find_by_email(&email).await?.is_some() {
            tracing::info!(email = %email, "Registration rejected: email already exists");
            return Err(UserError::EmailAlreadyExists(email));
        }

        let user = self
            .repository
            .create(UserRecord {
                email,
                password_hash,
                extra,
            })
            .await?;

        tracing::info!(email = %user.email, "User registered");

        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<IssuedToken, UserError> {
        let user = self.repository.find_by_email(email).await?;

        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();

        // Unknown emails still pay for one verification
        let result = tokio::task::spawn_blocking(move || match user {
            Some(user) => authenticator.authenticate(&password, &user.password_hash, &user.email),
            None => Err(authenticator.reject_unknown_subject(&password)),
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?;

        match result {
            Ok(result) => {
                tracing::info!(email = %email, "User authenticated");
                Ok(result.into())
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!("Authentication failed");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(email = %email, error = %e, "Password hash is unusable");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => Err(signing_error(e)),
        }
    }

    fn generate_token(&self, user: &UserRecord) -> Result<IssuedToken, UserError> {
        self.authenticator
            .generate_token(&user.email)
            .map(IssuedToken::from)
            .map_err(signing_error)
    }

    fn verify_token(&self, token: &str) -> Result<VerifiedToken, UserError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| match e {
            JwtError::TokenExpired => UserError::InvalidToken("token expired".to_string()),
            other => UserError::InvalidToken(other.to_string()),
        })?;

        let expires_at = claims
            .expires_at()
            .ok_or_else(|| UserError::InvalidToken("expiration out of range".to_string()))?;

        Ok(VerifiedToken {
            email: claims.sub,
            expires_at,
        })
    }
}

fn signing_error(e: JwtError) -> UserError {
    match e {
        JwtError::MissingSecret => UserError::Configuration(e.to_string()),
        other => UserError::Signing(other.to_string()),
    }
}
