//! Order ledger queries
//!
//! The ledger is the single source of truth for "is there an active order"
//! and for order history. `create` does not re-check the one-active-order
//! rule itself; the `orders_one_active_per_user` partial unique index closes
//! the check-then-insert race regardless of what callers do.

use shared::models::{Order, OrderDetails};
use sqlx::PgPool;

const DETAILS_COLUMNS: &str = r#"
    o.id, o.user_id, o.product_id, o.order_time, o.comments, o.active, o.received_at,
    p.name, p.description, p.image, p.price, p."time"
"#;

/// Insert a new active order and return the created row.
pub async fn create(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
    order_time: i64,
    comments: &str,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO orders (user_id, product_id, order_time, comments, active)
         VALUES ($1, $2, $3, $4, TRUE)
         RETURNING *",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(order_time)
    .bind(comments)
    .fetch_one(pool)
    .await
}

/// True iff the user has an order with `active = TRUE`.
pub async fn has_active(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE user_id = $1 AND active)")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// The user's active order joined with its product, if any.
///
/// The partial unique index guarantees at most one row; LIMIT 1 keeps the
/// query shape explicit anyway.
pub async fn find_active(pool: &PgPool, user_id: i64) -> Result<Option<OrderDetails>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {DETAILS_COLUMNS}
         FROM orders o
         JOIN products p ON p.id = o.product_id
         WHERE o.user_id = $1 AND o.active
         LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// All orders for the user, active and inactive, in creation order.
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<OrderDetails>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {DETAILS_COLUMNS}
         FROM orders o
         JOIN products p ON p.id = o.product_id
         WHERE o.user_id = $1
         ORDER BY o.id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, order_id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await
}

/// Hard-delete an order, returning the deleted row (None if absent).
pub async fn delete(pool: &PgPool, order_id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("DELETE FROM orders WHERE id = $1 RETURNING *")
        .bind(order_id)
        .fetch_optional(pool)
        .await
}

/// Flag an order received: `active` drops to FALSE, the row stays in history.
/// Returns false if no such order exists.
pub async fn mark_received(pool: &PgPool, order_id: i64, now: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders
         SET active = FALSE, received_at = COALESCE(received_at, $2)
         WHERE id = $1",
    )
    .bind(order_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
