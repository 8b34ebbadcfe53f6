use serde::Deserialize;

use marketplace_core::{OrderId, OrderInput, ProductId, ProductInput, UserChanges, UserId, UserInput};

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------
//
// Bodies are wrapped in a resource root key. A missing key yields an empty
// payload, which then fails validation like any other missing field.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub user: UserInput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub user: UserChanges,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductRequest {
    pub product: ProductInput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateOrderRequest {
    pub order: OrderInput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    pub session: SessionCredentials,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionCredentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

// -------------------------
// Path and query parsing
// -------------------------

/// Malformed ids cannot name an existing record, so they read as 404.
pub fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

pub fn parse_order_id(raw: &str) -> Result<OrderId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Collect the `product_ids` filter from query pairs.
///
/// Accepts repeated `product_ids` / `product_ids[]` keys and comma-separated
/// values. Returns `None` when no such key is present; ids that do not parse
/// are dropped.
pub fn product_ids_filter(pairs: &[(String, String)]) -> Option<Vec<ProductId>> {
    let mut seen_key = false;
    let mut ids = Vec::new();

    for (key, value) in pairs {
        if key != "product_ids" && key != "product_ids[]" {
            continue;
        }
        seen_key = true;
        for raw in value.split(',') {
            if let Ok(id) = raw.parse::<ProductId>() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
    }

    seen_key.then_some(ids)
}
