//! Transport seam for the workflow controller

use async_trait::async_trait;
use shared::models::{Order, OrderDetails, Product, ProductInfo, Profile};

use crate::error::ClientResult;

/// An authenticated session: the signed-in user's id plus the bearer token
/// presented on every subsequent request.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
}

/// Operations the workflow controller needs from the backend.
///
/// Implemented over HTTP by [`crate::ApiClient`]; tests substitute an
/// in-memory backend with the same ledger semantics.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn sign_up(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<()>;

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session>;

    async fn list_products(&self) -> ClientResult<Vec<Product>>;

    async fn get_product(&self, product_id: i64) -> ClientResult<ProductInfo>;

    async fn get_profile(&self, session: &Session) -> ClientResult<Profile>;

    /// Precondition gate for checkout: true iff an active order exists.
    async fn has_pending_orders(&self, session: &Session) -> ClientResult<bool>;

    async fn create_order(
        &self,
        session: &Session,
        product_id: i64,
        time: i64,
        comments: &str,
    ) -> ClientResult<Order>;

    async fn order_history(&self, session: &Session) -> ClientResult<Vec<OrderDetails>>;

    /// `Ok(None)` when there is no active order, a normal outcome rather than an
    /// error.
    async fn active_order(&self, session: &Session) -> ClientResult<Option<OrderDetails>>;

    /// Hard-cancel an order, returning the deleted row.
    async fn cancel_order(&self, session: &Session, order_id: i64) -> ClientResult<Order>;

    /// Flag an order received; it leaves the active slot but stays in history.
    async fn mark_received(&self, session: &Session, order_id: i64) -> ClientResult<()>;
}
