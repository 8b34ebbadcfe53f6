//! Products: listings owned by a user, with price and publish validation.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{ValidationErrors, messages};
use crate::id::{ProductId, UserId};

/// A product listed by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub user_id: UserId,
    pub title: String,
    pub price: Decimal,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(id: ProductId, user_id: UserId, valid: ValidProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            title: valid.title,
            price: valid.price,
            published: valid.published,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
        self.updated_at = now;
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Raw product payload. `price` and `published` stay untyped until
/// validation so that bad input becomes a field error, not a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub title: Option<String>,
    pub price: Option<Value>,
    pub published: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    pub title: String,
    pub price: Decimal,
    pub published: bool,
}

impl ProductInput {
    pub fn validate(self) -> Result<ValidProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.title.unwrap_or_default();
        if title.trim().is_empty() {
            errors.add("title", messages::BLANK);
        }

        let price = match self.price.as_ref().filter(|v| !is_blank(v)) {
            None => {
                errors.add("price", messages::BLANK);
                errors.add("price", messages::NOT_A_NUMBER);
                Decimal::ZERO
            }
            Some(raw) => check_price(raw, &mut errors),
        };

        let published = match &self.published {
            None => false,
            Some(raw) => check_published(raw, &mut errors),
        };

        errors.into_result(ValidProduct {
            title,
            price,
            published,
        })
    }
}

/// Partial product update; absent fields stay unchanged.
pub type ProductChanges = ProductInput;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub published: Option<bool>,
}

impl ProductChanges {
    pub fn validate_changes(self) -> Result<ProductPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.add("title", messages::BLANK);
            }
        }

        let price = self.price.as_ref().map(|raw| {
            if is_blank(raw) {
                errors.add("price", messages::BLANK);
                errors.add("price", messages::NOT_A_NUMBER);
                Decimal::ZERO
            } else {
                check_price(raw, &mut errors)
            }
        });

        let published = self
            .published
            .as_ref()
            .map(|raw| check_published(raw, &mut errors));

        errors.into_result(ProductPatch {
            title: self.title,
            price,
            published,
        })
    }
}

/// Parse a JSON number or numeric string into a decimal.
pub fn parse_price(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_price(raw: &Value, errors: &mut ValidationErrors) -> Decimal {
    match parse_price(raw) {
        None => {
            errors.add("price", messages::NOT_A_NUMBER);
            Decimal::ZERO
        }
        Some(price) if price.is_sign_negative() && !price.is_zero() => {
            errors.add("price", messages::NEGATIVE);
            price
        }
        Some(price) => price,
    }
}

fn check_published(raw: &Value, errors: &mut ValidationErrors) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => match s.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                errors.add("published", messages::NOT_A_BOOLEAN);
                false
            }
        },
        Value::Number(n) if n.as_u64() == Some(1) => true,
        Value::Number(n) if n.as_u64() == Some(0) => false,
        _ => {
            errors.add("published", messages::NOT_A_BOOLEAN);
            false
        }
    }
}
