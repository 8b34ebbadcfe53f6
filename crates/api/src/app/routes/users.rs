use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use chrono::Utc;

use marketplace_auth::Identity;
use marketplace_core::user::normalize_email;
use marketplace_core::{User, UserId, ValidationErrors, messages};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::serializers::UserJson;
use crate::app::services::AppServices;

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserJson>, ApiError> {
    let user = services.user(dto::parse_user_id(&user_id)?).await?;
    Ok(Json(services.render_user(&user).await?))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateUserRequest>,
) -> Result<(StatusCode, Json<UserJson>), ApiError> {
    let email = body.user.email.as_deref().map(normalize_email);
    let taken = email_taken(&services, email.as_deref(), None).await?;
    let valid = with_taken_email(body.user.validate(), taken)?;

    let password_hash = services.hash_password(valid.password).await?;
    let token = services.unique_token().await?;
    let user = User::new(UserId::new(), valid.email, password_hash, token, Utc::now());
    let user = services.store.insert_user(user).await?;

    tracing::info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(services.render_user(&user).await?)))
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> Result<Json<UserJson>, ApiError> {
    let user_id = identity.require(dto::parse_user_id(&user_id)?)?;
    let mut user = services.user(user_id).await?;

    let email = body.user.email.as_deref().map(normalize_email);
    let taken = email_taken(&services, email.as_deref(), Some(user_id)).await?;
    let patch = with_taken_email(body.user.validate(), taken)?;

    let password_hash = match &patch.password {
        Some(password) => Some(services.hash_password(password.clone()).await?),
        None => None,
    };
    user.apply(&patch, password_hash, Utc::now());
    let user = services.store.update_user(user).await?;

    tracing::info!(user_id = %user.id, "user updated");
    Ok(Json(services.render_user(&user).await?))
}

pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = identity.require(dto::parse_user_id(&user_id)?)?;
    if !services.store.delete_user(user_id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(user_id = %user_id, "user destroyed");
    Ok(StatusCode::NO_CONTENT)
}

/// Whether another user already holds `email`.
async fn email_taken(
    services: &AppServices,
    email: Option<&str>,
    except: Option<UserId>,
) -> Result<bool, ApiError> {
    let Some(email) = email.filter(|e| !e.is_empty()) else {
        return Ok(false);
    };
    let holder = services.store.find_user_by_email(email).await?;
    Ok(holder.is_some_and(|u| Some(u.id) != except))
}

/// Fold the uniqueness check into the field errors, after the format rules.
fn with_taken_email<T>(validated: Result<T, ValidationErrors>, taken: bool) -> Result<T, ApiError> {
    match (validated, taken) {
        (Ok(value), false) => Ok(value),
        (Ok(_), true) => Err(ValidationErrors::single("email", messages::TAKEN).into()),
        (Err(mut errors), taken) => {
            if taken {
                errors.add("email", messages::TAKEN);
            }
            Err(errors.into())
        }
    }
}
