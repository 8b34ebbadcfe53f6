use std::sync::Arc;

use async_trait::async_trait;

use marketplace_auth::{AuthError, TokenDirectory};
use marketplace_core::UserId;

use super::UserRepository;

/// Adapts any [`UserRepository`] into the authenticator's token lookup.
pub struct StoreTokenDirectory<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> StoreTokenDirectory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> TokenDirectory for StoreTokenDirectory<S>
where
    S: UserRepository + ?Sized,
{
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>, AuthError> {
        let user = self
            .store
            .find_user_by_token(token)
            .await
            .map_err(|e| AuthError::Lookup(e.to_string()))?;
        Ok(user.map(|u| u.id))
    }
}
