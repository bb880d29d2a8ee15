use thiserror::Error;

/// Error type for credential hashing operations.
///
/// Neither variant signals a wrong password: a mismatch is `Ok(false)`.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
