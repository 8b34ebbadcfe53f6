//! `marketplace-core`: domain model for the marketplace API.
//!
//! This crate contains **pure domain** types and validation rules (no HTTP,
//! no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod order;
pub mod product;
pub mod user;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, ValidationErrors, messages};
pub use id::{OrderId, ProductId, UserId};
pub use order::{Order, OrderInput, ValidOrderSelection};
pub use product::{Product, ProductChanges, ProductInput, ProductPatch, ValidProduct};
pub use user::{User, UserChanges, UserInput, UserPatch, ValidUser};
