//! Catalog endpoints, read-only product access

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductInfo};

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

/// GET /products
pub async fn list_products(State(state): State<AppState>) -> ServiceResult<Json<Vec<Product>>> {
    let products = db::products::list(&state.pool).await?;
    Ok(Json(products))
}

/// GET /products/:id
///
/// Unavailable products (available = 0) are still returned; the client
/// decides how to render them.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ProductInfo>> {
    let product = db::products::find_info(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}
