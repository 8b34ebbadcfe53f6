//! Postgres-backed store.
//!
//! Uniqueness and cascades are enforced by the schema in
//! `migrations/0001_marketplace.sql`; constraint violations are mapped back to
//! [`StoreError`] so callers see the same errors as with the in-memory store.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use marketplace_core::{Order, OrderId, Product, ProductId, User, UserId};

use super::{
    OrderFilter, OrderRepository, ProductFilter, ProductRepository, StoreError, StoreResult,
    UserRepository,
};

const SCHEMA: &str = include_str!("../../migrations/0001_marketplace.sql");
const MAX_CONNECTIONS: u32 = 10;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Create tables if they do not exist yet.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn attach_products(&self, rows: Vec<PgRow>) -> StoreResult<Vec<Order>> {
        let ids: Vec<Uuid> = rows
            .iter()
            .map(|r| r.try_get::<Uuid, _>("id"))
            .collect::<Result<_, _>>()
            .map_err(map_sqlx_error)?;

        let links = sqlx::query(
            r#"
            SELECT order_id, product_id
            FROM order_products
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut by_order: HashMap<Uuid, Vec<ProductId>> = HashMap::new();
        for link in &links {
            let order_id: Uuid = link.try_get("order_id").map_err(map_sqlx_error)?;
            let product_id: Uuid = link.try_get("product_id").map_err(map_sqlx_error)?;
            by_order
                .entry(order_id)
                .or_default()
                .push(ProductId::from_uuid(product_id));
        }

        rows.iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                let product_ids = by_order.remove(&id).unwrap_or_default();
                Ok(Order {
                    id: OrderId::from_uuid(id),
                    user_id: UserId::from_uuid(row.try_get("user_id")?),
                    total: row.try_get("total")?,
                    product_ids,
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(map_sqlx_error)
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::UniqueViolation(match db.constraint() {
                Some("users_email_key") => "email",
                Some("users_auth_token_key") => "auth_token",
                _ => "id",
            });
        }
        if db.is_foreign_key_violation() {
            return StoreError::MissingReference("user_id");
        }
    }
    tracing::error!(error = %err, "postgres store failure");
    StoreError::Backend(err.to_string())
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::from_uuid(row.try_get("id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        auth_token: row.try_get("auth_token")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        user_id: UserId::from_uuid(row.try_get("user_id")?),
        title: row.try_get("title")?,
        price: row.try_get("price")?,
        published: row.try_get("published")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, auth_token, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, user_id, title, price, published, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(user_from_row).transpose().map_err(map_sqlx_error)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(user_from_row).transpose().map_err(map_sqlx_error)
    }

    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE auth_token = $1"))
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(user_from_row).transpose().map_err(map_sqlx_error)
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, auth_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.auth_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(user)
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, auth_token = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.auth_token)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProductRepository for PostgresStore {
    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(product_from_row).transpose().map_err(map_sqlx_error)
    }

    async fn find_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let ids: Option<Vec<Uuid>> = filter
            .ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| *id.as_uuid()).collect());
        let owner: Option<Uuid> = filter.owner.map(Uuid::from);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY created_at, id
            "#
        ))
        .bind(ids)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        sqlx::query(
            r#"
            INSERT INTO products (id, user_id, title, price, published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.user_id.as_uuid())
        .bind(&product.title)
        .bind(product.price)
        .bind(product.published)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> StoreResult<Product> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET title = $2, price = $3, published = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.title)
        .bind(product.price)
        .bind(product.published)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderRepository for PostgresStore {
    async fn find_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let rows = sqlx::query("SELECT id, user_id, total, created_at, updated_at FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(self.attach_products(rows).await?.into_iter().next())
    }

    async fn find_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let owner: Option<Uuid> = filter.owner.map(Uuid::from);
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, total, created_at, updated_at
            FROM orders
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        self.attach_products(rows).await
    }

    async fn insert_order(&self, order: Order) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let ids: Vec<Uuid> = order.product_ids.iter().map(|id| *id.as_uuid()).collect();
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if usize::try_from(existing).ok() != Some(ids.len()) {
            return Err(StoreError::MissingReference("product_ids"));
        }

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.total)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for (position, product_id) in order.product_ids.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| StoreError::Backend("order has too many products".into()))?;
            sqlx::query(
                "INSERT INTO order_products (order_id, product_id, position) VALUES ($1, $2, $3)",
            )
            .bind(order.id.as_uuid())
            .bind(product_id.as_uuid())
            .bind(position)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(order)
    }

    async fn delete_order(&self, id: OrderId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
