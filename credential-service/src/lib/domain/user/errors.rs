use thiserror::Error;

/// Error for password policy failures at registration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,
}

/// Top-level error for all credential operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordError),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    /// Unknown email or wrong password. Deliberately carries no detail.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
