//! Response projections.
//!
//! Each type lists exactly the fields a client sees. Secrets on [`User`]
//! (password hash, auth token) have no field here and so never serialize.

use rust_decimal::Decimal;
use serde::Serialize;

use marketplace_core::{Order, OrderId, Product, ProductId, User, UserId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserJson {
    pub id: UserId,
    pub email: String,
    pub product_ids: Vec<ProductId>,
}

impl UserJson {
    /// `owned` may contain other users' products; only this user's are listed.
    pub fn new(user: &User, owned: &[Product]) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            product_ids: owned
                .iter()
                .filter(|p| p.is_owned_by(user.id))
                .map(|p| p.id)
                .collect(),
        }
    }
}

/// Product embedded one level below another resource (no `user`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummaryJson {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub published: bool,
}

impl From<&Product> for ProductSummaryJson {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            published: product.published,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductJson {
    #[serde(flatten)]
    pub product: ProductSummaryJson,
    pub user: UserJson,
}

impl ProductJson {
    pub fn new(product: &Product, owner: UserJson) -> Self {
        Self {
            product: ProductSummaryJson::from(product),
            user: owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderJson {
    pub id: OrderId,
    pub total: Decimal,
    pub products: Vec<ProductSummaryJson>,
}

impl OrderJson {
    /// Products are listed in the order's own order; ids with no matching
    /// product (deleted since) are skipped.
    pub fn new(order: &Order, products: &[Product]) -> Self {
        Self {
            id: order.id,
            total: order.total,
            products: order
                .product_ids
                .iter()
                .filter_map(|id| products.iter().find(|p| p.id == *id))
                .map(ProductSummaryJson::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductEnvelope {
    pub product: ProductJson,
}

#[derive(Debug, Serialize)]
pub struct ProductsEnvelope {
    pub products: Vec<ProductJson>,
}

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub order: OrderJson,
}

#[derive(Debug, Serialize)]
pub struct OrdersEnvelope {
    pub orders: Vec<OrderJson>,
}

#[derive(Debug, Serialize)]
pub struct SessionJson {
    pub user: UserJson,
    pub auth_token: String,
}
