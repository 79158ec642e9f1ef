//! Backend API client implementation.
//!
//! Bodies are read as text before parsing so failures can be logged with the
//! payload that caused them.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use shop_core::{Cart, CartId, CartItemId, CartItemInput, ProductPage};
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;

/// Number of body characters included in debug logs.
const LOG_BODY_CHARS: usize = 500;

/// Client for the shop backend REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client for a base address such as
    /// `http://localhost:8080/api/v1`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The configured base address.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL by appending path segments to the base address.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::from_response(status, &body));
        }

        Ok(body)
    }

    /// Send a request and decode the JSON body of a successful response.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            debug!(
                error = %e,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of the product listing.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that is not a JSON object.
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32, size: u32) -> Result<ProductPage, ApiError> {
        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string());

        let page: ProductPage = self.fetch(self.client.get(url)).await?;
        debug!(count = page.content.len(), "Fetched products");
        Ok(page)
    }

    // =========================================================================
    // Cart Methods (never cached - mutable state)
    // =========================================================================

    /// Get the current state of a cart.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that is not a JSON object.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: CartId) -> Result<Cart, ApiError> {
        let url = self.endpoint(&["cart", &cart_id.to_string()])?;
        self.fetch(self.client.get(url)).await
    }

    /// Add units of a product to a cart. The response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn add_item(&self, cart_id: CartId, input: CartItemInput) -> Result<(), ApiError> {
        let url = self.endpoint(&["cart", &cart_id.to_string(), "items"])?;
        self.send(self.client.post(url).json(&input)).await?;
        Ok(())
    }

    /// Remove a line item from a cart. The response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn remove_item(&self, cart_id: CartId, item_id: CartItemId) -> Result<(), ApiError> {
        let url = self.endpoint(&["cart", &cart_id.to_string(), "items", &item_id.to_string()])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Convert a cart into an order. The response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn create_order_from_cart(&self, cart_id: CartId) -> Result<(), ApiError> {
        let url = self.endpoint(&["orders", "from-cart", &cart_id.to_string()])?;
        self.send(self.client.post(url)).await?;
        Ok(())
    }
}
