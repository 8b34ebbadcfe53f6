//! `marketplace-auth`: token authentication and password credentials.
//!
//! This crate is intentionally decoupled from HTTP and storage: callers hand
//! in the raw header value and an [`Access`] mode, and provide token lookup
//! through the [`TokenDirectory`] trait.

pub mod authenticate;
pub mod identity;
pub mod password;
pub mod token;

pub use authenticate::{Access, AuthError, TokenAuthenticator, TokenDirectory};
pub use identity::Identity;
pub use password::PasswordHasher;
pub use token::{AuthToken, extract_token};
