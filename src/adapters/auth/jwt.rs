//! HS256 JWT issue and verify.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{TokenClaims, TokenService};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    username: String,
    iss: String,
    aud: String,
    iat: u64,
    exp: u64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl_hours: i64,
}

impl JwtTokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            ttl_hours: config.token_ttl_hours,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        // Expiry is exact; an expired token is invalid immediately.
        validation.leeway = 0;
        validation
    }
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn issue(
        &self,
        user_id: &crate::domain::foundation::UserId,
        email: &str,
        username: &str,
    ) -> Result<String, DomainError> {
        let now = Timestamp::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.as_unix_secs(),
            exp: now.plus_hours(self.ttl_hours).as_unix_secs(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Token signing failed: {}", e))
        })
    }

    async fn verify(&self, token: &str) -> Result<TokenClaims, DomainError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation())
            .map_err(|_| DomainError::new(ErrorCode::InvalidToken, "Invalid token"))?;
        let user_id = data
            .claims
            .sub
            .parse()
            .map_err(|_| DomainError::new(ErrorCode::InvalidToken, "Invalid token subject"))?;
        Ok(TokenClaims {
            user_id,
            email: data.claims.email,
            username: data.claims.username,
            expires_at: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn config(secret: &str, issuer: &str, audience: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_issuer: issuer.to_string(),
            jwt_audience: audience.to_string(),
            token_ttl_hours: 24,
        }
    }

    fn service() -> JwtTokenService {
        JwtTokenService::new(&config(
            "a-test-secret-that-is-long-enough!!",
            "catalog-api",
            "catalog-clients",
        ))
    }

    #[tokio::test]
    async fn issued_tokens_verify_with_their_claims() {
        let tokens = service();
        let user_id = UserId::new();
        let token = tokens
            .issue(&user_id, "a@example.com", "ada")
            .await
            .unwrap();

        let claims = tokens.verify(&token).await.unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.username, "ada");
        assert!(claims.expires_at > Timestamp::now().as_unix_secs());
    }

    #[tokio::test]
    async fn tampering_invalidates_the_token() {
        let tokens = service();
        let token = tokens
            .issue(&UserId::new(), "a@example.com", "ada")
            .await
            .unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(tokens.verify(&tampered).await.is_err());
    }

    #[tokio::test]
    async fn issuer_and_audience_must_match() {
        let token = service()
            .issue(&UserId::new(), "a@example.com", "ada")
            .await
            .unwrap();

        let wrong_issuer = JwtTokenService::new(&config(
            "a-test-secret-that-is-long-enough!!",
            "someone-else",
            "catalog-clients",
        ));
        assert!(wrong_issuer.verify(&token).await.is_err());

        let wrong_audience = JwtTokenService::new(&config(
            "a-test-secret-that-is-long-enough!!",
            "catalog-api",
            "other-clients",
        ));
        assert!(wrong_audience.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn a_different_secret_rejects_the_token() {
        let token = service()
            .issue(&UserId::new(), "a@example.com", "ada")
            .await
            .unwrap();
        let other = JwtTokenService::new(&config(
            "an-entirely-different-secret-value!",
            "catalog-api",
            "catalog-clients",
        ));
        assert!(other.verify(&token).await.is_err());
    }
}
