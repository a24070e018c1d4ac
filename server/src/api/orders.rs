//! Order ledger endpoints
//!
//! The checkout client gates on `GET /orders/pending/:user_id` before posting
//! an order; `POST /orders` itself performs no pending re-check. The
//! `orders_one_active_per_user` partial unique index backstops the window
//! between check and insert, surfacing the loser as a 409.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{DeleteOrderResponse, Order, OrderDetails, PendingOrdersResponse};

use crate::auth::session::SessionIdentity;
use crate::db;
use crate::error::{ServiceError, ServiceResult, is_unique_violation};
use crate::state::AppState;

/// POST /orders
#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    /// Order timestamp, Unix milliseconds
    pub time: Option<i64>,
    pub comments: Option<String>,
}

impl CreateOrderRequest {
    /// All four fields are required; comments may be empty but must be present.
    fn validate(self) -> Result<(i64, i64, i64, String), AppError> {
        let user_id = self.user_id.ok_or_else(|| AppError::required_field("user_id"))?;
        let product_id = self
            .product_id
            .ok_or_else(|| AppError::required_field("product_id"))?;
        let time = self.time.ok_or_else(|| AppError::required_field("time"))?;
        let comments = self
            .comments
            .ok_or_else(|| AppError::required_field("comments"))?;
        Ok((user_id, product_id, time, comments))
    }
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Json(req): Json<CreateOrderRequest>,
) -> ServiceResult<(StatusCode, Json<Order>)> {
    let (user_id, product_id, time, comments) = req.validate()?;

    if identity.user_id != user_id {
        return Err(AppError::forbidden("Order user does not match this session").into());
    }

    let order = db::orders::create(&state.pool, user_id, product_id, time, &comments)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "orders_one_active_per_user") {
                ServiceError::App(AppError::new(ErrorCode::ActiveOrderExists))
            } else {
                ServiceError::Db(e)
            }
        })?;

    tracing::info!(order_id = order.id, user_id, "Order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/pending/:user_id
pub async fn pending_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(user_id): Path<i64>,
) -> ServiceResult<Json<PendingOrdersResponse>> {
    verify_user(&identity, user_id)?;

    let has_pending_orders = db::orders::has_active(&state.pool, user_id).await?;

    Ok(Json(PendingOrdersResponse { has_pending_orders }))
}

/// GET /orders/user/:user_id
pub async fn list_user_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(user_id): Path<i64>,
) -> ServiceResult<Json<Vec<OrderDetails>>> {
    verify_user(&identity, user_id)?;

    let orders = db::orders::list_for_user(&state.pool, user_id).await?;

    Ok(Json(orders))
}

/// GET /orders/active/:user_id
///
/// 404 here is a normal outcome, not a failure: it means the user has no
/// in-flight order.
pub async fn active_order(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(user_id): Path<i64>,
) -> ServiceResult<Json<OrderDetails>> {
    verify_user(&identity, user_id)?;

    let order = db::orders::find_active(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::OrderNotFound, "No active order"))?;

    Ok(Json(order))
}

/// DELETE /orders/:order_id
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(order_id): Path<i64>,
) -> ServiceResult<Json<DeleteOrderResponse>> {
    verify_order_owner(&state, order_id, &identity).await?;

    let deleted_order = db::orders::delete(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    tracing::info!(order_id, user_id = identity.user_id, "Order deleted");

    Ok(Json(DeleteOrderResponse {
        message: "Order deleted".to_string(),
        deleted_order,
    }))
}

/// PUT /orders/:order_id/receive
pub async fn receive_order(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(order_id): Path<i64>,
) -> ServiceResult<Json<serde_json::Value>> {
    verify_order_owner(&state, order_id, &identity).await?;

    let now = shared::util::now_millis();
    let updated = db::orders::mark_received(&state.pool, order_id, now).await?;

    if !updated {
        return Err(AppError::new(ErrorCode::OrderNotFound).into());
    }

    tracing::info!(order_id, user_id = identity.user_id, "Order received");

    Ok(Json(serde_json::json!({ "message": "Order received" })))
}

fn verify_user(identity: &SessionIdentity, user_id: i64) -> Result<(), AppError> {
    if identity.user_id != user_id {
        return Err(AppError::forbidden("Orders do not belong to this session"));
    }
    Ok(())
}

/// Verify that an order exists and belongs to the session user.
async fn verify_order_owner(
    state: &AppState,
    order_id: i64,
    identity: &SessionIdentity,
) -> Result<(), ServiceError> {
    let order = db::orders::find_by_id(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if order.user_id != identity.user_id {
        return Err(AppError::forbidden("Order does not belong to this session").into());
    }
    Ok(())
}
