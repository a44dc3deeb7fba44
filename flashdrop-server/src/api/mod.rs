//! HTTP API for FlashDrop Market

pub mod auth;
pub mod extract;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::Router;
use axum::routing::{get, post};
use shared::error::AppError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let auth = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me));

    let orders = Router::new()
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/{id}", get(orders::get))
        .route("/orders/{id}/confirm", post(orders::confirm))
        .route("/orders/{id}/reject", post(orders::reject));

    let catalog = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        );

    let users = Router::new()
        .route("/users", get(users::list))
        .route("/users/{id}", axum::routing::put(users::update).delete(users::delete));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth)
        .merge(orders)
        .merge(catalog)
        .merge(users)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
