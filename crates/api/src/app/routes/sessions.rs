use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use chrono::Utc;

use marketplace_auth::Identity;
use marketplace_core::user::normalize_email;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::serializers::SessionJson;
use crate::app::services::AppServices;

/// Log in: verify credentials and hand out a fresh token.
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateSessionRequest>,
) -> Result<Json<SessionJson>, ApiError> {
    let dto::SessionCredentials { email, password } = body.session;
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::InvalidCredentials);
    };

    let Some(mut user) = services.store.find_user_by_email(&normalize_email(&email)).await? else {
        return Err(ApiError::InvalidCredentials);
    };
    if !services.verify_password(password, user.password_hash.clone()).await? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = services.unique_token().await?;
    user.rotate_token(token, Utc::now());
    let user = services.store.update_user(user).await?;

    tracing::info!(user_id = %user.id, "session created");
    Ok(Json(SessionJson {
        user: services.render_user(&user).await?,
        auth_token: user.auth_token.clone(),
    }))
}

/// Log out: the holder of `token` gets a new one, invalidating the old.
pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    let Some(mut user) = services.store.find_user_by_token(&token).await? else {
        return Err(ApiError::Unauthorized);
    };
    identity.require(user.id)?;

    let replacement = services.unique_token().await?;
    user.rotate_token(replacement, Utc::now());
    services.store.update_user(user).await?;

    tracing::info!(user_id = ?identity.user_id(), "session destroyed");
    Ok(StatusCode::NO_CONTENT)
}
