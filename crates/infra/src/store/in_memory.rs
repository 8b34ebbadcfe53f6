use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use marketplace_core::{Entity, Order, OrderId, Product, ProductId, User, UserId};

use super::{
    OrderFilter, OrderRepository, ProductFilter, ProductRepository, StoreError, StoreResult,
    UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

/// In-memory store for tests/dev.
///
/// All tables sit behind one lock, so unique checks, inserts and cascading
/// deletes are each a single atomic step. Rows keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }
}

fn position<T: Entity>(rows: &[T], id: T::Id) -> Option<usize> {
    rows.iter().position(|row| row.id() == id)
}

fn ensure_unique_user(users: &[User], candidate: &User) -> StoreResult<()> {
    for other in users.iter().filter(|u| u.id != candidate.id) {
        if other.email == candidate.email {
            return Err(StoreError::UniqueViolation("email"));
        }
        if other.auth_token == candidate.auth_token {
            return Err(StoreError::UniqueViolation("auth_token"));
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.auth_token == token).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.write()?;
        if position(&tables.users, user.id).is_some() {
            return Err(StoreError::UniqueViolation("id"));
        }
        ensure_unique_user(&tables.users, &user)?;
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.write()?;
        let idx = position(&tables.users, user.id).ok_or(StoreError::NotFound)?;
        ensure_unique_user(&tables.users, &user)?;
        tables.users[idx] = user.clone();
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let Some(idx) = position(&tables.users, id) else {
            return Ok(false);
        };
        tables.users.remove(idx);
        tables.products.retain(|p| p.user_id != id);
        tables.orders.retain(|o| o.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let tables = self.read()?;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let tables = self.read()?;
        Ok(tables
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        let mut tables = self.write()?;
        if position(&tables.users, product.user_id).is_none() {
            return Err(StoreError::MissingReference("user_id"));
        }
        if position(&tables.products, product.id).is_some() {
            return Err(StoreError::UniqueViolation("id"));
        }
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> StoreResult<Product> {
        let mut tables = self.write()?;
        let idx = position(&tables.products, product.id).ok_or(StoreError::NotFound)?;
        tables.products[idx] = product.clone();
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let Some(idx) = position(&tables.products, id) else {
            return Ok(false);
        };
        tables.products.remove(idx);
        Ok(true)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let tables = self.read()?;
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect())
    }

    async fn insert_order(&self, order: Order) -> StoreResult<Order> {
        let mut tables = self.write()?;
        if position(&tables.users, order.user_id).is_none() {
            return Err(StoreError::MissingReference("user_id"));
        }
        if let Some(missing) = order
            .product_ids
            .iter()
            .find(|id| position(&tables.products, **id).is_none())
        {
            tracing::debug!(product_id = %missing, "order references unknown product");
            return Err(StoreError::MissingReference("product_ids"));
        }
        if position(&tables.orders, order.id).is_some() {
            return Err(StoreError::UniqueViolation("id"));
        }
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn delete_order(&self, id: OrderId) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let Some(idx) = position(&tables.orders, id) else {
            return Ok(false);
        };
        tables.orders.remove(idx);
        Ok(true)
    }
}
