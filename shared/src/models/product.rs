//! Product catalog models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as returned by `GET /products`
///
/// Read-only from the order workflow's perspective; rows are seeded and
/// managed outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Image URL or path reference
    pub image: String,
    pub price: Decimal,
    /// Availability count; 0 means currently unavailable but still listed
    pub available: i32,
    /// Preparation/pickup timing text (e.g. "10-15 min")
    pub time: String,
}

/// Product subset returned by `GET /products/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductInfo {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Decimal,
    pub available: i32,
    pub time: String,
}
