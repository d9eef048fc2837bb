//! Credential and token adapters.

mod argon2;
mod jwt;

pub use self::argon2::Argon2PasswordHasher;
pub use jwt::JwtTokenService;
