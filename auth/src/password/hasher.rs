use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides adaptive one-way hashing (internally uses bcrypt).
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// bcrypt work factor applied to every new hash.
    pub const WORK_FACTOR: u32 = 10;

    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher using the fixed work factor
    pub fn new() -> Self {
        Self {
            cost: Self::WORK_FACTOR,
        }
    }

    /// Hash a plaintext password.
    ///
    /// A fresh salt is generated for every call, so hashing the same
    /// plaintext twice yields two different strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt format hash (`$2b$10$...`, salt included)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored bcrypt hash
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid bcrypt string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash)
            .map_err(|e| PasswordError::VerificationFailed(format!("Invalid password hash: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
