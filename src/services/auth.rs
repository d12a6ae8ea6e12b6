use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Password hashing and HS256 session tokens
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        Ok(Self::new(
            &config.jwt_secret,
            config.token_ttl()?,
            config.bcrypt_cost,
        ))
    }

    /// Hashes on the blocking pool
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// A malformed stored hash counts as a mismatch
    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?;

        Ok(verified.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored password hash could not be checked");
            false
        }))
    }

    pub fn issue_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret", Duration::from_secs(3600), 4)
    }

    #[tokio::test]
    async fn test_hash_differs_from_plaintext_and_verifies() {
        let auth = service();
        let hash = auth.hash_password("secret123").await.unwrap();

        assert_ne!(hash, "secret123");
        assert!(auth.verify_password("secret123", &hash).await.unwrap());
        assert!(!auth.verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_a_mismatch() {
        let auth = service();
        assert!(!auth.verify_password("secret123", "not-a-hash").await.unwrap());
    }

    #[test]
    fn test_huge_ttl_saturates_expiry() {
        let auth = AuthService::new("test-secret", Duration::from_secs(u64::MAX), 4);
        let token = tokio_test::assert_ok!(auth.issue_token(Uuid::new_v4()));
        let claims = tokio_test::assert_ok!(auth.verify_token(&token));
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn test_token_round_trip() {
        let auth = service();
        let user_id = Uuid::new_v4();

        let token = tokio_test::assert_ok!(auth.issue_token(user_id));
        let claims = tokio_test::assert_ok!(auth.verify_token(&token));

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = service().issue_token(Uuid::new_v4()).unwrap();
        let other = AuthService::new("other-secret", Duration::from_secs(3600), 4);
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }
}
