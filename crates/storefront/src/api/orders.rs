//! Shopper order endpoints.

use reqwest::Method;
use tracing::instrument;

use atelier_core::{OrderId, OrderStatus};

use crate::store::AuthToken;

use super::types::{NewOrder, Order, StatusUpdate, unwrap_resource};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Place a demo order. No payment is taken.
    ///
    /// The token is optional: guests order without one. The response body
    /// is decoded when it looks like an order (bare or under `order`);
    /// otherwise the order is still placed and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or is unreachable.
    #[instrument(skip(self, order, token), fields(items = order.items.len(), guest = token.is_none()))]
    pub async fn place_demo_order(
        &self,
        order: &NewOrder,
        token: Option<&AuthToken>,
    ) -> Result<Option<Order>, ApiError> {
        let url = self.endpoint(&["orders", "demo"])?;
        let body = self
            .send_raw(self.request(Method::POST, url, token)?.json(order))
            .await?;

        let placed = serde_json::from_str(&body)
            .ok()
            .and_then(|value| unwrap_resource::<Order>(value, "order"));
        if placed.is_none() {
            tracing::debug!("Order response did not contain an order record");
        }
        Ok(placed)
    }

    /// Orders placed by the session's user.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &AuthToken) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["orders", "my-orders"])?;
        self.send(self.request(Method::GET, url, Some(token))?).await
    }

    /// Change the status of one of the session user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not the user's or the request fails.
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &AuthToken,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders", id.as_str(), "status"])?;
        let body = StatusUpdate {
            order_status: status,
        };
        self.send(self.request(Method::PUT, url, Some(token))?.json(&body))
            .await
    }
}
