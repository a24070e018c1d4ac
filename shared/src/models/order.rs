//! Order ledger models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bare order row
///
/// `active` flips true to false exactly once, through cancel (hard delete) or
/// receive; it never flips back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    /// Creation timestamp, Unix milliseconds
    pub order_time: i64,
    pub comments: String,
    pub active: bool,
    /// Set when the order is marked received; the row stays in history
    pub received_at: Option<i64>,
}

/// An order joined with its product, as rendered in the orders view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderDetails {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub order_time: i64,
    pub comments: String,
    pub active: bool,
    pub received_at: Option<i64>,
    // Joined product fields
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Decimal,
    /// Product preparation/pickup timing text
    pub time: String,
}

/// Response body for `GET /orders/pending/:user_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrdersResponse {
    pub has_pending_orders: bool,
}

/// Response body for `DELETE /orders/:order_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrderResponse {
    pub message: String,
    pub deleted_order: Order,
}
