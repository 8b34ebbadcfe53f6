use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
};
use chrono::Utc;

use marketplace_auth::Identity;
use marketplace_core::{Product, ProductId};
use marketplace_infra::ProductFilter;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::serializers::{ProductEnvelope, ProductsEnvelope};
use crate::app::services::AppServices;

pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ProductsEnvelope>, ApiError> {
    let filter = match dto::product_ids_filter(&params) {
        Some(ids) => ProductFilter::with_ids(ids),
        None => ProductFilter::all(),
    };
    let products = services.store.find_products(&filter).await?;
    Ok(Json(ProductsEnvelope {
        products: services.render_products(&products).await?,
    }))
}

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<ProductEnvelope>, ApiError> {
    let product = services.product(dto::parse_product_id(&id)?).await?;
    Ok(Json(ProductEnvelope {
        product: services.render_product(&product).await?,
    }))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<String>,
    Json(body): Json<dto::ProductRequest>,
) -> Result<(StatusCode, Json<ProductEnvelope>), ApiError> {
    let owner = identity.require(dto::parse_user_id(&user_id)?)?;
    let valid = body.product.validate()?;

    let product = Product::new(ProductId::new(), owner, valid, Utc::now());
    let product = services.store.insert_product(product).await?;

    tracing::info!(user_id = %owner, product_id = %product.id, "product created");
    Ok((
        StatusCode::CREATED,
        Json(ProductEnvelope {
            product: services.render_product(&product).await?,
        }),
    ))
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path((user_id, id)): Path<(String, String)>,
    Json(body): Json<dto::ProductRequest>,
) -> Result<Json<ProductEnvelope>, ApiError> {
    let mut product = owned_product(&services, &identity, &user_id, &id).await?;
    let patch = body.product.validate_changes()?;

    product.apply(patch, Utc::now());
    let product = services.store.update_product(product).await?;

    tracing::info!(product_id = %product.id, "product updated");
    Ok(Json(ProductEnvelope {
        product: services.render_product(&product).await?,
    }))
}

pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let product = owned_product(&services, &identity, &user_id, &id).await?;
    if !services.store.delete_product(product.id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(product_id = %product.id, "product destroyed");
    Ok(StatusCode::NO_CONTENT)
}

/// The caller must be the path user, and the product must be theirs.
async fn owned_product(
    services: &AppServices,
    identity: &Identity,
    user_id: &str,
    id: &str,
) -> Result<Product, ApiError> {
    let owner = identity.require(dto::parse_user_id(user_id)?)?;
    let product = services.product(dto::parse_product_id(id)?).await?;
    if !product.is_owned_by(owner) {
        return Err(ApiError::Unauthorized);
    }
    Ok(product)
}
