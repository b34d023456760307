use async_trait::async_trait;

use crate::domain::user::models::IssuedToken;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserRecord;
use crate::domain::user::models::VerifiedToken;
use crate::user::errors::UserError;

/// Port for credential service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Email, validated password and extra fields
    ///
    /// # Returns
    /// Stored record (contains the hash, never the plaintext)
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `Storage` - Store read or write failed
    async fn register(&self, command: RegisterUserCommand) -> Result<UserRecord, UserError>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password or unusable stored
    ///   hash (indistinguishable, including in cost)
    /// * `Signing` - Token could not be signed
    /// * `Storage` - Store read failed
    async fn authenticate(&self, email: &str, password: &str) -> Result<IssuedToken, UserError>;

    /// Issue a token for an already-authenticated record.
    ///
    /// Performs no password check.
    ///
    /// # Errors
    /// * `Signing` - Token could not be signed
    fn generate_token(&self, user: &UserRecord) -> Result<IssuedToken, UserError>;

    /// Validate a bearer token and recover its subject.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, forged or expired
    fn verify_token(&self, token: &str) -> Result<VerifiedToken, UserError>;
}

/// Persistence operations for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Append a record and durably flush the whole store.
    ///
    /// No uniqueness check is performed at this layer.
    ///
    /// # Errors
    /// * `Storage` - Write failed; the record is not kept
    async fn create(&self, user: UserRecord) -> Result<UserRecord, UserError>;

    /// Retrieve the first record whose email matches exactly.
    ///
    /// Re-reads durable storage before scanning.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Read or parse failed
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError>;

    /// Retrieve all records in insertion order.
    ///
    /// # Errors
    /// * `Storage` - Read or parse failed
    async fn list_all(&self) -> Result<Vec<UserRecord>, UserError>;
}
