use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub mod orders;
pub mod products;
pub mod sessions;
pub mod system;
pub mod users;

/// Routes open to anonymous callers: reads, signup and login.
pub fn public_router() -> Router {
    Router::new()
        .route("/users", post(users::create))
        .route("/users/:user_id", get(users::show))
        .route("/sessions", post(sessions::create))
        .route("/products", get(products::index))
        .route("/products/:id", get(products::show))
}

/// Routes that run behind the token authenticator.
pub fn authenticated_router() -> Router {
    Router::new()
        .route(
            "/users/:user_id",
            patch(users::update).put(users::update).delete(users::destroy),
        )
        .route("/sessions/:token", delete(sessions::destroy))
        .route("/users/:user_id/products", post(products::create))
        .route(
            "/users/:user_id/products/:id",
            patch(products::update)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/users/:user_id/orders", get(orders::index).post(orders::create))
        .route(
            "/users/:user_id/orders/:id",
            get(orders::show).delete(orders::destroy),
        )
}
