use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// `sub` and `username` are mandatory: a token missing either fails to
/// decode and is rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Display username of the subject at issuance time
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp). Absent means the token never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create claims for an authenticated user, issued now, without expiry.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `username` - Username of the user
    pub fn for_user(user_id: impl ToString, username: impl Into<String>) -> Self {
        Self {
            sub: user_id.to_string(),
            username: username.into(),
            iat: Utc::now().timestamp(),
            exp: None,
        }
    }

    /// Set expiration relative to the issued-at time.
    pub fn expiring_in(mut self, ttl: Duration) -> Self {
        self.exp = Some(self.iat + ttl.num_seconds());
        self
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user("user123", "alice");

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert!(claims.exp.is_none());
        assert!(claims.iat > 0);
    }

    #[test]
    fn test_expiring_in() {
        let claims = Claims::for_user("user123", "alice").expiring_in(Duration::hours(24));

        let exp = claims.exp.unwrap();
        assert_eq!(exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let mut claims = Claims::for_user("user123", "alice");
        claims.exp = Some(1000);

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_is_expired_no_exp_claim() {
        let claims = Claims::for_user("user123", "alice");
        assert!(!claims.is_expired(9999999999));
    }

    #[test]
    fn test_exp_omitted_from_payload_when_absent() {
        let claims = Claims::for_user("user123", "alice");
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "user123");
        assert_eq!(json["username"], "alice");
        assert!(json.get("exp").is_none());
    }
}
