use std::sync::OnceLock;

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining credential hashing and token issuance.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Option<Duration>,
    decoy_hash: OnceLock<Option<String>>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
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
    /// Create a new authenticator issuing tokens without expiry.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl: None,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Stamp every issued token with an `exp` claim `hours` after issuance.
    pub fn with_token_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl = Some(Duration::hours(hours));
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for the given subject.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - User identifier placed in `sub`
    /// * `username` - Username placed in the claims
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(subject, username)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Fail a login that named no known user.
    ///
    /// Runs one verification against a decoy hash so the rejection costs
    /// about as much as a wrong password.
    pub fn reject_unknown_user(&self, password: &str) -> AuthenticationError {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash("unknown-user-decoy").ok());

        if let Some(decoy) = decoy {
            let _ = self.password_hasher.verify(password, decoy);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Issue a signed token without password verification.
    ///
    /// Used right after sign-up, where the caller has just chosen the password.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: impl ToString, username: &str) -> Result<String, JwtError> {
        let claims = Claims::for_user(subject, username);
        let claims = match self.token_ttl {
            Some(ttl) => claims.expiring_in(ttl),
            None => claims,
        };

        self.jwt_handler.encode(&claims)
    }

    /// Validate a token and return its claims.
    ///
    /// Does not consult any user store.
    ///
    /// # Errors
    /// * `JwtError` - Token is expired, forged or malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
