use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;

use crate::user::errors::PasswordError;

/// Open set of extra fields supplied at registration and persisted verbatim.
pub type ExtraFields = Map<String, Value>;

/// Keys owned by `UserRecord` itself; never taken from extra fields.
pub const RESERVED_FIELDS: [&str; 3] = ["email", "password", "passwordHash"];

/// Stored credential record for one registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Identity, case-sensitive as received
    pub email: String,
    /// Argon2id PHC string, never the plaintext
    pub password_hash: String,
    pub extra: ExtraFields,
}

/// Plaintext password accepted for registration.
///
/// Non-empty; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Create a password, rejecting the empty string.
    ///
    /// # Errors
    /// * `Empty` - Password is the empty string
    pub fn new(password: String) -> Result<Self, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new user
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub email: String,
    pub password: Password,
    pub extra: ExtraFields,
}

impl RegisterUserCommand {
    /// Construct a new register command.
    ///
    /// Reserved keys are dropped from `extra` so they cannot shadow the
    /// record's own fields.
    ///
    /// # Arguments
    /// * `email` - Identity to register
    /// * `password` - Validated plaintext password (hashed by the service)
    /// * `extra` - Additional fields to persist
    pub fn new(email: String, password: Password, mut extra: ExtraFields) -> Self {
        for key in RESERVED_FIELDS {
            extra.remove(key);
        }

        Self {
            email,
            password,
            extra,
        }
    }
}

/// Signed bearer token handed to an authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<auth::AuthenticationResult> for IssuedToken {
    fn from(result: auth::AuthenticationResult) -> Self {
        Self {
            token: result.access_token,
            expires_at: result.expires_at,
        }
    }
}

/// Identity recovered from a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}
