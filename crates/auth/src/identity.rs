use marketplace_core::UserId;

use crate::authenticate::AuthError;

/// Who a request acts as.
///
/// Resolved once per request by the [`crate::TokenAuthenticator`] and passed
/// explicitly to controllers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No token, or a token nobody holds, on a read-only request.
    Anonymous,
    User(UserId),
}

impl Identity {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Identity::Anonymous => None,
            Identity::User(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User(_))
    }

    /// Succeeds only when this identity *is* `owner`.
    pub fn require(&self, owner: UserId) -> Result<UserId, AuthError> {
        match self {
            Identity::User(id) if *id == owner => Ok(*id),
            _ => Err(AuthError::Unauthenticated),
        }
    }
}
