use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use chrono::Utc;

use marketplace_auth::Identity;
use marketplace_core::{Order, OrderId, ValidOrderSelection};
use marketplace_infra::{OrderFilter, ProductFilter};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::serializers::{OrderEnvelope, OrdersEnvelope};
use crate::app::services::AppServices;

pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<String>,
) -> Result<Json<OrdersEnvelope>, ApiError> {
    let owner = identity.require(dto::parse_user_id(&user_id)?)?;

    let orders = services.store.find_orders(&OrderFilter::owned_by(owner)).await?;
    let mut rendered = Vec::with_capacity(orders.len());
    for order in &orders {
        rendered.push(services.render_order(order).await?);
    }
    Ok(Json(OrdersEnvelope { orders: rendered }))
}

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let order = owned_order(&services, &identity, &user_id, &id).await?;
    Ok(Json(OrderEnvelope {
        order: services.render_order(&order).await?,
    }))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<String>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderEnvelope>), ApiError> {
    let owner = identity.require(dto::parse_user_id(&user_id)?)?;

    let requested = body.order.requested_products()?;
    let found = services
        .store
        .find_products(&ProductFilter::with_ids(requested.clone()))
        .await?;
    let selection = ValidOrderSelection::resolve(&requested, &found)?;

    let order = Order::new(OrderId::new(), owner, selection, Utc::now());
    let order = services.store.insert_order(order).await?;

    tracing::info!(user_id = %owner, order_id = %order.id, total = %order.total, "order placed");
    Ok((
        StatusCode::CREATED,
        Json(OrderEnvelope {
            order: services.render_order(&order).await?,
        }),
    ))
}

pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let order = owned_order(&services, &identity, &user_id, &id).await?;
    if !services.store.delete_order(order.id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(order_id = %order.id, "order destroyed");
    Ok(StatusCode::NO_CONTENT)
}

async fn owned_order(
    services: &AppServices,
    identity: &Identity,
    user_id: &str,
    id: &str,
) -> Result<Order, ApiError> {
    let owner = identity.require(dto::parse_user_id(user_id)?)?;
    let order = services
        .store
        .find_order(dto::parse_order_id(id)?)
        .await?
        .ok_or(ApiError::NotFound)?;
    if !order.is_owned_by(owner) {
        return Err(ApiError::Unauthorized);
    }
    Ok(order)
}
