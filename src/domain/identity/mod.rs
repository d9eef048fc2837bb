//! Identity domain - user accounts.

mod user;

pub use user::{User, UserDraft};
