//! Admin endpoints. All of them require an admin session token.

use reqwest::Method;
use tracing::instrument;

use atelier_core::{OrderId, OrderStatus, ProductId};

use crate::store::AuthToken;

use super::types::{NewProduct, Order, Product, StatusUpdate, UserSummary, unwrap_resource};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Every order in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not an admin's or the request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_orders(&self, token: &AuthToken) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["admin", "orders"])?;
        self.send(self.request(Method::GET, url, Some(token))?).await
    }

    /// Change the status of any order.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not an admin's or the request fails.
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn admin_update_order_status(
        &self,
        token: &AuthToken,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint(&["admin", "orders", id.as_str(), "status"])?;
        let body = StatusUpdate {
            order_status: status,
        };
        self.send(self.request(Method::PUT, url, Some(token))?.json(&body))
            .await
    }

    /// Every registered user.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not an admin's or the request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_users(&self, token: &AuthToken) -> Result<Vec<UserSummary>, ApiError> {
        let url = self.endpoint(&["admin", "users"])?;
        self.send(self.request(Method::GET, url, Some(token))?).await
    }

    /// Add a product to the catalog.
    ///
    /// The catalog cache is dropped once the API accepts the product.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not an admin's or the API rejects
    /// the product.
    #[instrument(skip(self, token, product), fields(title = %product.title))]
    pub async fn create_product(
        &self,
        token: &AuthToken,
        product: &NewProduct,
    ) -> Result<Option<Product>, ApiError> {
        let url = self.endpoint(&["admin", "products"])?;
        let body = self
            .send_raw(self.request(Method::POST, url, Some(token))?.json(product))
            .await?;
        self.invalidate_catalog();

        Ok(serde_json::from_str(&body)
            .ok()
            .and_then(|value| unwrap_resource::<Product>(value, "product")))
    }

    /// Remove a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not an admin's or the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &AuthToken, id: &ProductId) -> Result<(), ApiError> {
        let url = self.endpoint(&["admin", "products", id.as_str()])?;
        self.send_raw(self.request(Method::DELETE, url, Some(token))?)
            .await?;
        self.invalidate_catalog();
        Ok(())
    }
}
