use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri, header, uri::PathAndQuery},
    middleware::Next,
    response::Response,
};

use marketplace_auth::{TokenAuthenticator, extract_token};

use crate::app::errors::ApiError;
use crate::context::access_for;
use crate::versioning::VersionNegotiator;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: TokenAuthenticator,
}

/// Resolve the caller's [`crate::context::Identity`] and attach it to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access = access_for(req.method());
    let token = authorization_header(req.headers());

    let identity = state
        .authenticator
        .authenticate(access, extract_token(token))
        .await?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Rewrite the request into its `/v{N}` namespace before routing.
pub async fn negotiate_version(State(negotiator): State<VersionNegotiator>, mut req: Request) -> Request {
    let accept = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());
    let version = negotiator.negotiate(accept);

    match prefixed_uri(req.uri(), &version.path_prefix()) {
        Some(uri) => *req.uri_mut() = uri,
        None => tracing::debug!(uri = %req.uri(), "could not rewrite request uri"),
    }
    req.extensions_mut().insert(version);
    req
}

fn prefixed_uri(uri: &Uri, prefix: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{prefix}{}?{query}", uri.path()),
        None => format!("{prefix}{}", uri.path()),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}
