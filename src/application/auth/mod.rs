//! Authentication flow: login, registration, token validation.

use serde::Deserialize;
use thiserror::Error;

use crate::application::dto::UserDto;

mod service;

pub use service::AuthService;

/// Login input. The identifier is an email when it contains `@`,
/// otherwise a username.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Registration input. The password arrives raw and is hashed before it
/// touches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A successful login or registration: the signed token plus the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSuccess {
    pub token: String,
    pub user: UserDto,
}

/// Authentication failures.
///
/// `InvalidCredentials` deliberately does not distinguish an unknown
/// identifier from a wrong password.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("an account with this email or username already exists")]
    DuplicateIdentity,
    #[error("authentication failed: {0}")]
    Internal(String),
}
