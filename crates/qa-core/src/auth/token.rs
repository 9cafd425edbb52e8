use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{QaError, QaResult};

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, lifetime_minutes: i64) -> Self {
        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            lifetime: Duration::try_minutes(lifetime_minutes).unwrap_or(Duration::MAX),
        }
    }

    /// Sign an access token for `username`.
    pub fn issue(&self, username: &str) -> QaResult<String> {
        self.issue_with_lifetime(username, self.lifetime)
    }

    fn issue_with_lifetime(&self, username: &str, lifetime: Duration) -> QaResult<String> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| QaError::Auth("Token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| QaError::Auth(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and extract its claims.
    pub fn verify(&self, token: &str) -> QaResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    QaError::unauthorized("Token expired")
                }
                _ => QaError::unauthorized("Could not validate credentials"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let tokens = TokenService::new("test-secret", 30);
        let token = tokens.issue("alice").unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenService::new("secret-a", 30).issue("alice").unwrap();
        assert!(matches!(
            TokenService::new("secret-b", 30).verify(&token),
            Err(QaError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_rejected() {
        let tokens = TokenService::new("test-secret", 30);
        let token = tokens
            .issue_with_lifetime("alice", Duration::minutes(-10))
            .unwrap();
        match tokens.verify(&token) {
            Err(QaError::Unauthorized(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("expected expiry, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let tokens = TokenService::new("test-secret", i64::MAX);
        assert!(matches!(tokens.issue("alice"), Err(QaError::Auth(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = TokenService::new("test-secret", 30);
        assert!(tokens.verify("not.a.token").is_err());
    }
}
