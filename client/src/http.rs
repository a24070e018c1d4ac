//! HTTP implementation of [`OrderApi`] over reqwest

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, ErrorCode};
use shared::models::{
    DeleteOrderResponse, Order, OrderDetails, Product, ProductInfo, Profile, SignInResponse,
};

use crate::api::{OrderApi, Session};
use crate::error::{ClientError, ClientResult};

/// Default bound on any single request round trip. A hung request resolves to
/// a retryable timeout instead of an indefinite loading state.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for comanda-server
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a caller-supplied request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Http)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decode a response: success bodies deserialize to `T`, error bodies are
    /// lifted out of the `{code, message}` envelope into [`ClientError::Api`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                ClientError::InvalidResponse(format!("body did not match expected shape: {e}"))
            });
        }

        let envelope = response.json::<ApiResponse<serde_json::Value>>().await;
        let (code, message) = match envelope {
            Ok(body) => {
                let code = body
                    .code
                    .and_then(|raw| ErrorCode::try_from(raw).ok())
                    .unwrap_or(ErrorCode::Unknown);
                (code, body.message)
            }
            Err(_) => (ErrorCode::Unknown, status.to_string()),
        };

        Err(ClientError::Api {
            code,
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl OrderApi for ApiClient {
    async fn sign_up(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url("/signup"))
            .json(&serde_json::json!({
                "firstName": first_name,
                "lastName": last_name,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let response = self
            .http
            .post(self.url("/signin"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: SignInResponse = Self::decode(response).await?;
        Ok(Session {
            user_id: body.user_id,
            token: body.token,
        })
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let response = self.http.get(self.url("/products")).send().await?;
        Self::decode(response).await
    }

    async fn get_product(&self, product_id: i64) -> ClientResult<ProductInfo> {
        let response = self
            .http
            .get(self.url(&format!("/products/{product_id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_profile(&self, session: &Session) -> ClientResult<Profile> {
        let response = self
            .http
            .get(self.url(&format!("/profile/{}", session.user_id)))
            .bearer_auth(&session.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn has_pending_orders(&self, session: &Session) -> ClientResult<bool> {
        let response = self
            .http
            .get(self.url(&format!("/orders/pending/{}", session.user_id)))
            .bearer_auth(&session.token)
            .send()
            .await?;
        let body: shared::models::PendingOrdersResponse = Self::decode(response).await?;
        Ok(body.has_pending_orders)
    }

    async fn create_order(
        &self,
        session: &Session,
        product_id: i64,
        time: i64,
        comments: &str,
    ) -> ClientResult<Order> {
        let response = self
            .http
            .post(self.url("/orders"))
            .bearer_auth(&session.token)
            .json(&serde_json::json!({
                "user_id": session.user_id,
                "product_id": product_id,
                "time": time,
                "comments": comments,
            }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn order_history(&self, session: &Session) -> ClientResult<Vec<OrderDetails>> {
        let response = self
            .http
            .get(self.url(&format!("/orders/user/{}", session.user_id)))
            .bearer_auth(&session.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn active_order(&self, session: &Session) -> ClientResult<Option<OrderDetails>> {
        let response = self
            .http
            .get(self.url(&format!("/orders/active/{}", session.user_id)))
            .bearer_auth(&session.token)
            .send()
            .await?;
        match Self::decode::<OrderDetails>(response).await {
            Ok(order) => Ok(Some(order)),
            // No active order is a normal state for this endpoint
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn cancel_order(&self, session: &Session, order_id: i64) -> ClientResult<Order> {
        let response = self
            .http
            .delete(self.url(&format!("/orders/{order_id}")))
            .bearer_auth(&session.token)
            .send()
            .await?;
        let body: DeleteOrderResponse = Self::decode(response).await?;
        Ok(body.deleted_order)
    }

    async fn mark_received(&self, session: &Session, order_id: i64) -> ClientResult<()> {
        let response = self
            .http
            .put(self.url(&format!("/orders/{order_id}/receive")))
            .bearer_auth(&session.token)
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.url("/products"), "http://localhost:5000/products");
    }
}
