//! Token signer/verifier port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    /// Expiry as Unix seconds.
    pub expires_at: u64,
}

/// Issues and verifies signed, time-bound identity tokens.
///
/// Verification checks signature, issuer, audience, and expiry.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Issues a signed token for the subject.
    ///
    /// # Errors
    ///
    /// - `InternalError` if signing fails
    async fn issue(&self, user_id: &UserId, email: &str, username: &str)
        -> Result<String, DomainError>;

    /// Verifies a raw token and returns its claims.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` for a tampered, expired, or mis-addressed token
    async fn verify(&self, token: &str) -> Result<TokenClaims, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_service_is_object_safe() {
        fn _accepts_dyn(_tokens: &dyn TokenService) {}
    }
}
