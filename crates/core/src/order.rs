//! Orders: a user's purchase of one or more products.
//!
//! The total is always derived from the selected products' prices; any
//! total the client sends is ignored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{ValidationErrors, messages};
use crate::id::{OrderId, ProductId, UserId};
use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    /// Never empty.
    pub product_ids: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(id: OrderId, user_id: UserId, selection: ValidOrderSelection, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            total: selection.total,
            product_ids: selection.product_ids,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}

/// Raw order payload. Only `product_ids` is honoured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub product_ids: Option<Vec<Value>>,
}

impl OrderInput {
    /// Parse the requested product ids (deduplicated, request order kept).
    pub fn requested_products(&self) -> Result<Vec<ProductId>, ValidationErrors> {
        let raw = self.product_ids.as_deref().unwrap_or_default();
        if raw.is_empty() {
            return Err(ValidationErrors::single("product_ids", messages::BLANK));
        }

        let mut ids: Vec<ProductId> = Vec::with_capacity(raw.len());
        for value in raw {
            let parsed = value.as_str().and_then(|s| s.parse::<ProductId>().ok());
            let Some(id) = parsed else {
                return Err(ValidationErrors::single("product_ids", messages::INVALID));
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

/// A non-empty product selection whose ids all resolved, with its total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOrderSelection {
    pub product_ids: Vec<ProductId>,
    pub total: Decimal,
}

impl ValidOrderSelection {
    /// Match requested ids against the products the store returned.
    pub fn resolve(requested: &[ProductId], found: &[Product]) -> Result<Self, ValidationErrors> {
        if requested.is_empty() {
            return Err(ValidationErrors::single("product_ids", messages::BLANK));
        }

        let mut total = Decimal::ZERO;
        for id in requested {
            let Some(product) = found.iter().find(|p| p.id == *id) else {
                return Err(ValidationErrors::single("product_ids", messages::INVALID));
            };
            let Some(sum) = total.checked_add(product.price) else {
                return Err(ValidationErrors::single("total", messages::TOO_LARGE));
            };
            total = sum;
        }

        Ok(Self {
            product_ids: requested.to_vec(),
            total,
        })
    }
}
