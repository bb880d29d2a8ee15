use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
