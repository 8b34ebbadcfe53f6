//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and credential wiring shared by all controllers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request bodies and path/query parsing
//! - `serializers.rs`: response projections
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::middleware;
use crate::versioning::{ApiVersion, VersionNegotiator};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod serializers;
pub mod services;

pub use services::{AppServices, BuildError};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> Result<Router, BuildError> {
    let services = Arc::new(services::build_services(config).await?);
    let negotiator = VersionNegotiator::new(&config.api_vendor, config.default_api_version);
    Ok(build_router(services, negotiator))
}

/// Assemble the router around already-built services.
///
/// `/health` is unversioned. Every other request is rewritten into its
/// negotiated `/v{N}` namespace before routing.
pub fn build_router(services: Arc<AppServices>, negotiator: VersionNegotiator) -> Router {
    let versioned = ServiceBuilder::new()
        .layer(axum::middleware::map_request_with_state(
            negotiator,
            middleware::negotiate_version,
        ))
        .service(versioned_router(services));

    Router::new()
        .route("/health", get(routes::system::health))
        .fallback_service(versioned)
        .layer(TraceLayer::new_for_http())
}

fn versioned_router(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        authenticator: services.authenticator(),
    };

    let v1 = routes::public_router()
        .merge(routes::authenticated_router().route_layer(
            axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware),
        ))
        .method_not_allowed_fallback(routes::system::method_not_allowed)
        .layer(Extension(services));

    Router::new()
        .nest(&ApiVersion::V1.path_prefix(), v1)
        .fallback(routes::system::not_found)
}
