use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the admin guard
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid password")]
    InvalidPassword,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Token has been revoked")]
    Revoked,

    #[error("Admin login is disabled")]
    Disabled,

    #[error("Invalid token: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub exp: i64,
    pub jti: String,
}

/// Issued admin session
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Shared-password admin guard issuing HS256 tokens
///
/// Login is disabled unless both the password and the signing secret are
/// set. Logged-out token ids are remembered until the token would have
/// expired.
pub struct AdminAuth {
    password: String,
    enabled: bool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: u64,
    revoked: moka::future::Cache<String, ()>,
}

impl AdminAuth {
    pub fn new(password: String, jwt_secret: &str, token_ttl_secs: u64) -> Self {
        let revoked = moka::future::CacheBuilder::new(10_000)
            .time_to_live(Duration::from_secs(token_ttl_secs.max(1)))
            .build();

        Self {
            enabled: !password.is_empty() && !jwt_secret.is_empty(),
            password,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl_secs,
            revoked,
        }
    }

    pub fn login_enabled(&self) -> bool {
        self.enabled
    }

    /// Check the password and issue a token
    pub fn login(&self, password: &str) -> Result<IssuedToken, AuthError> {
        if !self.enabled || password != self.password {
            return Err(AuthError::InvalidPassword);
        }

        let expires_at = Utc::now() + ChronoDuration::seconds(self.token_ttl_secs as i64);
        let claims = AdminClaims {
            sub: "admin".to_string(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token's signature, expiry and revocation state
    pub async fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        if !self.enabled {
            return Err(AuthError::Disabled);
        }

        let data = decode::<AdminClaims>(token, &self.decoding_key, &Validation::default())?;

        if self.revoked.contains_key(&data.claims.jti) {
            return Err(AuthError::Revoked);
        }

        Ok(data.claims)
    }

    /// Validate the `Authorization: Bearer <token>` header value
    pub async fn verify_header(&self, header: Option<&str>) -> Result<AdminClaims, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token).await
    }

    /// Revoke a token so later checks fail
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.verify(token).await?;
        self.revoked.insert(claims.jti, ()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AdminAuth {
        AdminAuth::new("s3cret".to_string(), "test-signing-key", 3600)
    }

    #[test]
    fn test_wrong_password_rejected() {
        assert!(matches!(auth().login("nope"), Err(AuthError::InvalidPassword)));
    }

    #[test]
    fn test_empty_password_disables_login() {
        let auth = AdminAuth::new(String::new(), "key", 60);
        assert!(!auth.login_enabled());
        assert!(auth.login("").is_err());
    }

    #[test]
    fn test_empty_secret_disables_login() {
        let auth = AdminAuth::new("s3cret".to_string(), "", 60);
        assert!(!auth.login_enabled());
        assert!(matches!(auth.login("s3cret"), Err(AuthError::InvalidPassword)));

        // A token signed with the empty key must not pass either
        let claims = AdminClaims {
            sub: "admin".to_string(),
            exp: (Utc::now() + ChronoDuration::hours(1)).timestamp(),
            jti: "forged".to_string(),
        };
        let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"")).unwrap();
        let result = tokio_test::block_on(auth.verify(&forged));
        assert!(matches!(result, Err(AuthError::Disabled)));
    }

    #[tokio::test]
    async fn test_issued_token_verifies() {
        let auth = auth();
        let issued = auth.login("s3cret").unwrap();
        assert!(issued.expires_at > Utc::now());

        let header = format!("Bearer {}", issued.token);
        let claims = auth.verify_header(Some(&header)).await.unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[tokio::test]
    async fn test_missing_or_foreign_token() {
        let auth = auth();
        assert!(matches!(auth.verify_header(None).await, Err(AuthError::MissingToken)));

        let other = AdminAuth::new("s3cret".to_string(), "another-key", 3600);
        let foreign = other.login("s3cret").unwrap();
        assert!(matches!(auth.verify(&foreign.token).await, Err(AuthError::TokenError(_))));
    }

    #[test]
    fn test_logout_revokes_token() {
        let auth = auth();
        let issued = auth.login("s3cret").unwrap();

        tokio_test::block_on(async {
            auth.logout(&issued.token).await.unwrap();
            assert!(matches!(auth.verify(&issued.token).await, Err(AuthError::Revoked)));
        });
    }
}
