//! Infrastructure layer: persistence for users, products and orders.

pub mod store;

pub use store::{
    InMemoryStore, MarketplaceStore, OrderFilter, OrderRepository, ProductFilter,
    ProductRepository, StoreError, StoreResult, StoreTokenDirectory, UserRepository,
};
#[cfg(feature = "postgres")]
pub use store::PostgresStore;
