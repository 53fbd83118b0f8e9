//! Catalog endpoints.

use reqwest::Method;
use tracing::{debug, instrument};

use atelier_core::{Price, ProductId};

use super::cache::{CacheKey, CacheValue};
use super::types::{Product, ProductPage};
use super::{ApiClient, ApiError};

/// Catalog filter for `GET /products`.
///
/// Unset and blank filters are left off the query string; `page` is always
/// sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: Option<u32>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            gender: None,
            size: None,
            min_price: None,
            max_price: None,
            search: None,
            page: 1,
            limit: None,
        }
    }
}

impl ProductQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    #[must_use]
    pub const fn min_price(mut self, price: Price) -> Self {
        self.min_price = Some(price);
        self
    }

    #[must_use]
    pub const fn max_price(mut self, price: Price) -> Self {
        self.max_price = Some(price);
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Page number, starting at 1. Zero is treated as 1.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs, in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("category", &self.category),
            ("gender", &self.gender),
            ("size", &self.size),
        ];
        let mut pairs: Vec<(&'static str, String)> = text
            .into_iter()
            .filter_map(|(key, value)| non_blank(value.as_deref()).map(|v| (key, v.to_string())))
            .collect();

        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.amount().to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.amount().to_string()));
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            pairs.push(("search", search.to_string()));
        }
        pairs.push(("page", self.page.max(1).to_string()));
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ApiClient {
    /// List catalog products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(page = query.page))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let cache_key = CacheKey::Products(query.clone());

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut()
            .extend_pairs(query.to_pairs().iter().map(|(k, v)| (*k, v.as_str())));

        let page: ProductPage = self.send(self.request(Method::GET, url, None)?).await?;
        debug!(count = page.products.len(), "Fetched products");

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", id.as_str()])?;
        let product: Product = self.send(self.request(Method::GET, url, None)?).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
