//! Authentication for Crafter accounts
//!
//! Password hashing, session token issuance and the signup/login flows built on them.

pub mod handlers;
mod password;
mod service;
mod token;

pub use password::{PasswordError, PasswordHasher};
pub use service::{AuthService, Registration};
pub use token::{Claims, TokenIssuer, TokenKind};
