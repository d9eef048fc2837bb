//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// JWT signing and validation settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,

    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub jwt_audience: String,

    /// Token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        if self.token_ttl_hours <= 0 {
            return Err(ValidationError::InvalidTokenLifetime);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: default_issuer(),
            jwt_audience: default_audience(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

fn default_issuer() -> String {
    "catalog-api".to_string()
}

fn default_audience() -> String {
    "catalog-clients".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_fails_validation() {
        assert!(AuthConfig::default().validate().is_err());
    }

    #[test]
    fn short_secrets_are_rejected() {
        let config = AuthConfig {
            jwt_secret: "too-short".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WeakJwtSecret)
        ));
    }

    #[test]
    fn long_secret_with_defaults_passes() {
        let config = AuthConfig {
            jwt_secret: "a".repeat(32),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.token_ttl_hours, 24);
    }
}
