use shared::models::{Product, ProductInfo};
use sqlx::PgPool;

pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        r#"SELECT id, name, description, image, price, available, "time"
           FROM products
           ORDER BY id"#,
    )
    .fetch_all(pool)
    .await
}

/// Fetch the `GET /products/:id` subset. Rows with `available = 0` are still
/// returned; availability is a display concern, not a fetch gate.
pub async fn find_info(pool: &PgPool, id: i64) -> Result<Option<ProductInfo>, sqlx::Error> {
    sqlx::query_as(
        r#"SELECT name, description, image, price, available, "time"
           FROM products
           WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
