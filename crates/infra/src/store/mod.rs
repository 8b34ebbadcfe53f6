//! Repository abstractions over the marketplace tables.
//!
//! Every operation is a single atomic call that either fully succeeds or
//! fails with a [`StoreError`]. Uniqueness of user email and auth token is
//! enforced here, not by callers.

use async_trait::async_trait;
use thiserror::Error;

use marketplace_core::{Order, OrderId, Product, ProductId, User, UserId};

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod token_directory;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
pub use token_directory::StoreTokenDirectory;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique column already holds this value (`email`, `auth_token`, `id`).
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),

    /// The record to update does not exist.
    #[error("record not found")]
    NotFound,

    /// A referenced record (e.g. the owning user) does not exist.
    #[error("missing referenced record for {0}")]
    MissingReference(&'static str),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Which products to list. The default lists every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Restrict to these ids (an empty set matches nothing).
    pub ids: Option<Vec<ProductId>>,
    pub owner: Option<UserId>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: Vec<ProductId>) -> Self {
        Self {
            ids: Some(ids),
            owner: None,
        }
    }

    pub fn owned_by(owner: UserId) -> Self {
        Self {
            ids: None,
            owner: Some(owner),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let id_ok = self.ids.as_ref().is_none_or(|ids| ids.contains(&product.id));
        let owner_ok = self.owner.is_none_or(|owner| product.user_id == owner);
        id_ok && owner_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub owner: Option<UserId>,
}

impl OrderFilter {
    pub fn owned_by(owner: UserId) -> Self {
        Self { owner: Some(owner) }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.owner.is_none_or(|owner| order.user_id == owner)
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;
    /// Exact match on the normalized (lowercase) email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Exact, case-sensitive match on the auth token.
    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>>;
    async fn insert_user(&self, user: User) -> StoreResult<User>;
    async fn update_user(&self, user: User) -> StoreResult<User>;
    /// Also removes the user's products and orders. Returns whether a row was deleted.
    async fn delete_user(&self, id: UserId) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>>;
    /// Matching products in creation order.
    async fn find_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;
    async fn insert_product(&self, product: Product) -> StoreResult<Product>;
    async fn update_product(&self, product: Product) -> StoreResult<Product>;
    async fn delete_product(&self, id: ProductId) -> StoreResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_order(&self, id: OrderId) -> StoreResult<Option<Order>>;
    /// Matching orders in creation order.
    async fn find_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>>;
    async fn insert_order(&self, order: Order) -> StoreResult<Order>;
    async fn delete_order(&self, id: OrderId) -> StoreResult<bool>;
}

/// Everything the API needs from persistence.
pub trait MarketplaceStore: UserRepository + ProductRepository + OrderRepository {}

impl<T> MarketplaceStore for T where T: UserRepository + ProductRepository + OrderRepository + ?Sized {}
