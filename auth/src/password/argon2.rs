use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Salted Argon2id. The work factor is the Argon2 time cost (number of
/// passes over memory); memory and parallelism stay at the library defaults.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Work factor used when none is configured.
    pub const DEFAULT_WORK_FACTOR: u32 = 10;

    /// Create a hasher with the default work factor.
    ///
    /// # Returns
    /// PasswordHasher instance configured with `DEFAULT_WORK_FACTOR`
    pub fn new() -> Self {
        Self::with_work_factor(Self::DEFAULT_WORK_FACTOR)
            .unwrap_or_else(|_| Self { params: Params::default() })
    }

    /// Create a hasher with an explicit work factor.
    ///
    /// # Arguments
    /// * `work_factor` - Argon2 time cost, must be at least 1
    ///
    /// # Errors
    /// * `InvalidWorkFactor` - Argon2 rejected the parameters
    pub fn with_work_factor(work_factor: u32) -> Result<Self, PasswordError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            work_factor,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| PasswordError::InvalidWorkFactor(format!("{}: {}", work_factor, e)))?;

        Ok(Self { params })
    }

    /// Configured work factor.
    pub fn work_factor(&self) -> u32 {
        self.params.t_cost()
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The cost parameters are taken from the stored PHC string, so hashes
    /// produced under an older work factor keep verifying.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
