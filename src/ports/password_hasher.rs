//! Password hashing port.
//!
//! The hashing primitive itself is external; the auth flow only needs
//! hash-and-verify. Raw secrets never leave this seam.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// One-way hash and verify for credentials.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a raw secret into a storable string.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the primitive fails (rare)
    async fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verifies a raw secret against a stored hash.
    ///
    /// Returns `false` for a mismatch or an unparseable hash; never errors
    /// on bad input.
    async fn verify(&self, password: &str, hash: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hasher_is_object_safe() {
        fn _accepts_dyn(_hasher: &dyn PasswordHasher) {}
    }
}
