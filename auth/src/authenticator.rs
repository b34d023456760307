use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Every token it mints carries the subject it was asked for and expires
/// `token_lifetime` after issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_lifetime: Duration,
    /// Hash verified against when the subject has no stored hash
    placeholder_hash: OnceLock<String>,
}

const PLACEHOLDER_PASSWORD: &str = "placeholder-password-never-issued";

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,

    /// Instant after which the token is rejected
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Default token lifetime (one hour).
    pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    pub fn new(jwt_secret: &[u8]) -> Result<Self, JwtError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret)?,
            token_lifetime: Duration::seconds(Self::DEFAULT_TOKEN_LIFETIME_SECONDS),
            placeholder_hash: OnceLock::new(),
        })
    }

    /// Replace the password hasher (e.g. to change the work factor).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self.placeholder_hash = OnceLock::new();
        self
    }

    /// Replace the token lifetime.
    pub fn with_token_lifetime(mut self, token_lifetime: Duration) -> Self {
        self.token_lifetime = token_lifetime;
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate a JWT token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identity to place in the `sub` claim
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.generate_token(subject)?)
    }

    /// Reject a login attempt for a subject that has no stored hash.
    ///
    /// Verifies `password` against a placeholder hash made with the
    /// configured hasher, so the call costs the same as a wrong password.
    ///
    /// # Returns
    /// `InvalidCredentials`, or `PasswordError` if the placeholder hash
    /// could not be produced
    pub fn reject_unknown_subject(&self, password: &str) -> AuthenticationError {
        match self.placeholder_hash() {
            Ok(hash) => match self.password_hasher.verify(password, hash) {
                Ok(_) => AuthenticationError::InvalidCredentials,
                Err(e) => AuthenticationError::PasswordError(e),
            },
            Err(e) => AuthenticationError::PasswordError(e),
        }
    }

    fn placeholder_hash(&self) -> Result<&str, PasswordError> {
        if let Some(hash) = self.placeholder_hash.get() {
            return Ok(hash.as_str());
        }

        let hash = self.password_hasher.hash(PLACEHOLDER_PASSWORD)?;
        Ok(self.placeholder_hash.get_or_init(|| hash).as_str())
    }

    /// Generate JWT token without password verification.
    ///
    /// Only call this after the caller has authenticated the subject by
    /// other means.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, subject: &str) -> Result<AuthenticationResult, JwtError> {
        self.generate_token_at(subject, Utc::now())
    }

    /// Generate JWT token as if issued at `issued_at`.
    pub fn generate_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::issued_at(subject, issued_at, self.token_lifetime);
        let access_token = self.jwt_handler.encode(&claims)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed("expiration out of range".to_string()))?;

        Ok(AuthenticationResult {
            access_token,
            expires_at,
        })
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
