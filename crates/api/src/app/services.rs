use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use marketplace_auth::{AuthToken, PasswordHasher, TokenAuthenticator};
use marketplace_core::{Order, Product, ProductId, User, UserId};
use marketplace_infra::{InMemoryStore, MarketplaceStore, ProductFilter, StoreError, StoreTokenDirectory};

use crate::app::errors::ApiError;
use crate::app::serializers::{OrderJson, ProductJson, UserJson};
use crate::config::ApiConfig;

#[cfg(feature = "postgres")]
use marketplace_infra::PostgresStore;

/// Attempts at drawing a token nobody holds before giving up.
const MAX_TOKEN_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("persistent stores requested but this build lacks the `postgres` feature")]
    PostgresUnavailable,

    #[error("failed to initialise store: {0}")]
    Store(#[from] StoreError),
}

/// Shared state handed to every controller.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn MarketplaceStore>,
    pub hasher: PasswordHasher,
}

impl AppServices {
    pub fn new(store: Arc<dyn MarketplaceStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub fn in_memory(hasher: PasswordHasher) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), hasher)
    }

    pub fn authenticator(&self) -> TokenAuthenticator {
        TokenAuthenticator::new(Arc::new(StoreTokenDirectory::new(self.store.clone())))
    }

    // -------------------------
    // Credentials
    // -------------------------

    pub async fn hash_password(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(ApiError::from)
    }

    pub async fn verify_password(&self, password: String, hash: String) -> Result<bool, ApiError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    /// A token no user currently holds. The store still rejects a duplicate
    /// written concurrently.
    pub async fn unique_token(&self) -> Result<String, ApiError> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = AuthToken::generate();
            if self.store.find_user_by_token(token.as_str()).await?.is_none() {
                return Ok(token.into_string());
            }
            tracing::warn!("generated auth token already in use; retrying");
        }
        Err(ApiError::Internal("could not generate a unique auth token".into()))
    }

    // -------------------------
    // Lookups
    // -------------------------

    pub async fn user(&self, id: UserId) -> Result<User, ApiError> {
        self.store.find_user(id).await?.ok_or(ApiError::NotFound)
    }

    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.store.find_product(id).await?.ok_or(ApiError::NotFound)
    }

    // -------------------------
    // Rendering
    // -------------------------

    pub async fn render_user(&self, user: &User) -> Result<UserJson, ApiError> {
        let owned = self.store.find_products(&ProductFilter::owned_by(user.id)).await?;
        Ok(UserJson::new(user, &owned))
    }

    pub async fn render_product(&self, product: &Product) -> Result<ProductJson, ApiError> {
        let owner = self.user(product.user_id).await?;
        Ok(ProductJson::new(product, self.render_user(&owner).await?))
    }

    /// Owners are looked up once per distinct user. Products whose owner has
    /// vanished in the meantime are left out.
    pub async fn render_products(&self, products: &[Product]) -> Result<Vec<ProductJson>, ApiError> {
        let mut owners: HashMap<UserId, Option<UserJson>> = HashMap::new();
        let mut rendered = Vec::with_capacity(products.len());

        for product in products {
            if !owners.contains_key(&product.user_id) {
                let owner = match self.store.find_user(product.user_id).await? {
                    Some(user) => Some(self.render_user(&user).await?),
                    None => None,
                };
                owners.insert(product.user_id, owner);
            }
            if let Some(Some(owner)) = owners.get(&product.user_id) {
                rendered.push(ProductJson::new(product, owner.clone()));
            }
        }
        Ok(rendered)
    }

    pub async fn render_order(&self, order: &Order) -> Result<OrderJson, ApiError> {
        let products = self
            .store
            .find_products(&ProductFilter::with_ids(order.product_ids.clone()))
            .await?;
        Ok(OrderJson::new(order, &products))
    }
}

/// Build services from configuration (in-memory unless persistent stores are enabled).
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, BuildError> {
    let hasher = config.password_hasher();

    match &config.database_url {
        None => {
            tracing::info!("using in-memory stores");
            Ok(AppServices::in_memory(hasher))
        }
        #[cfg(feature = "postgres")]
        Some(url) => {
            tracing::info!("using PostgreSQL stores");
            let store = PostgresStore::connect(url).await?;
            store.migrate().await?;
            Ok(AppServices::new(Arc::new(store), hasher))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => Err(BuildError::PostgresUnavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> AppServices {
        AppServices::in_memory(PasswordHasher::new(4).unwrap())
    }

    #[tokio::test]
    async fn password_round_trip_runs_off_the_runtime() {
        let services = services();
        let hash = services.hash_password("password123".into()).await.unwrap();

        assert!(services.verify_password("password123".into(), hash.clone()).await.unwrap());
        assert!(!services.verify_password("password124".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn unique_tokens_differ() {
        let services = services();
        let a = services.unique_token().await.unwrap();
        let b = services.unique_token().await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let services = services();
        assert!(matches!(services.user(UserId::new()).await, Err(ApiError::NotFound)));
        assert!(matches!(services.product(ProductId::new()).await, Err(ApiError::NotFound)));
    }
}
