//! API routes for comanda-server

pub mod account;
pub mod catalog;
pub mod health;
pub mod orders;

use crate::auth::session::session_auth_middleware;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Account + catalog (no auth)
    let public = Router::new()
        .route("/signup", post(account::sign_up))
        .route("/signin", post(account::sign_in))
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product));

    // Profile + order ledger (session authenticated)
    let authenticated = Router::new()
        .route("/profile/{user_id}", get(account::get_profile))
        .route("/orders", post(orders::create_order))
        .route("/orders/pending/{user_id}", get(orders::pending_orders))
        .route("/orders/user/{user_id}", get(orders::list_user_orders))
        .route("/orders/active/{user_id}", get(orders::active_order))
        .route("/orders/{order_id}", delete(orders::delete_order))
        .route("/orders/{order_id}/receive", put(orders::receive_order))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
