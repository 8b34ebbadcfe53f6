use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use marketplace_core::UserId;

use crate::identity::Identity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No user holds the presented token (or the caller is not the owner).
    #[error("not authenticated")]
    Unauthenticated,

    #[error("token lookup failed: {0}")]
    Lookup(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidCost(u32),
}

/// What the request intends to do, derived from its method by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    /// GET / HEAD / OPTIONS.
    Read,
    /// POST / PUT / PATCH / DELETE.
    Write,
}

/// Token → user lookup, provided by the storage layer.
#[async_trait]
pub trait TokenDirectory: Send + Sync {
    /// Exact, case-sensitive match on the stored token.
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>, AuthError>;
}

/// Resolves the request's [`Identity`] from its auth token.
///
/// - Reads proceed anonymously when no user matches.
/// - Writes fail with [`AuthError::Unauthenticated`] when no user matches.
#[derive(Clone)]
pub struct TokenAuthenticator {
    directory: Arc<dyn TokenDirectory>,
}

impl TokenAuthenticator {
    pub fn new(directory: Arc<dyn TokenDirectory>) -> Self {
        Self { directory }
    }

    pub async fn authenticate(&self, access: Access, token: Option<&str>) -> Result<Identity, AuthError> {
        let user = match token {
            Some(token) => self.directory.user_for_token(token).await?,
            None => None,
        };

        match (user, access) {
            (Some(user_id), _) => Ok(Identity::User(user_id)),
            (None, Access::Read) => Ok(Identity::Anonymous),
            (None, Access::Write) => {
                tracing::debug!(token_present = token.is_some(), "rejecting unauthenticated write");
                Err(AuthError::Unauthenticated)
            }
        }
    }
}
