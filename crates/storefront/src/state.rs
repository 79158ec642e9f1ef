//! Client-side storefront state and the operations that change it.
//!
//! The storefront holds two pieces of state, the current product page and the
//! cart, and treats the backend as the single source of truth: every mutation
//! is followed by a full refetch of the cart instead of a local patch.
//!
//! Failures of any kind (transport, status, malformed body) are collapsed into
//! one path: the error is logged and the affected state keeps its last known
//! value. Nothing is retried.
//!
//! Mutations are not serialized. Two overlapping `add_to_cart` calls both hit
//! the backend and their refetches may land in either order; the last one to
//! complete wins.

use shop_core::{Cart, CartId, CartItemId, CartItemInput, Product, ProductId};
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

use crate::api::ApiClient;
use crate::config::ShopConfig;
use crate::notifier::Notifier;

/// Storefront client state shared by the terminal front end.
#[derive(Debug)]
pub struct Storefront<N> {
    api: ApiClient,
    cart_id: CartId,
    page: u32,
    page_size: u32,
    notifier: N,
    products: RwLock<Vec<Product>>,
    cart: RwLock<Cart>,
}

impl<N: Notifier> Storefront<N> {
    /// Create a storefront with empty state.
    ///
    /// Nothing is fetched until [`refresh`](Self::refresh) or one of the load
    /// operations is called.
    #[must_use]
    pub fn new(config: &ShopConfig, notifier: N) -> Self {
        Self::with_api(
            ApiClient::new(config.api_base_url.clone()),
            config,
            notifier,
        )
    }

    /// Create a storefront around an existing API client.
    #[must_use]
    pub fn with_api(api: ApiClient, config: &ShopConfig, notifier: N) -> Self {
        Self {
            api,
            cart_id: config.cart_id,
            page: config.page,
            page_size: config.page_size,
            notifier,
            products: RwLock::new(Vec::new()),
            cart: RwLock::new(Cart::empty()),
        }
    }

    /// The cart this storefront works on.
    #[must_use]
    pub const fn cart_id(&self) -> CartId {
        self.cart_id
    }

    /// Snapshot of the current product page.
    pub async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    // =========================================================================
    // Loads
    // =========================================================================

    /// Load products and cart concurrently. No ordering between the two.
    pub async fn refresh(&self) {
        tokio::join!(self.load_products(), self.load_cart());
    }

    /// Replace the product state with the configured page.
    ///
    /// On failure the error is logged and the previous products are kept.
    #[instrument(skip(self), fields(page = self.page, size = self.page_size))]
    pub async fn load_products(&self) {
        match self.api.list_products(self.page, self.page_size).await {
            Ok(page) => {
                debug!(count = page.content.len(), "Replacing product state");
                *self.products.write().await = page.content;
            }
            Err(e) => error!(error = %e, "Failed to load products"),
        }
    }

    /// Replace the cart state with the backend's current cart.
    ///
    /// On failure the error is logged and the previous cart is kept.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn load_cart(&self) {
        match self.api.get_cart(self.cart_id).await {
            Ok(cart) => {
                debug!(items = cart.items.len(), "Replacing cart state");
                *self.cart.write().await = cart;
            }
            Err(e) => error!(error = %e, "Failed to load cart"),
        }
    }

    // =========================================================================
    // Mutations (each followed by a full cart refetch)
    // =========================================================================

    /// Add one unit of a product, then refetch the cart.
    ///
    /// If the add request fails the cart is not refetched and stays as it was.
    #[instrument(skip(self), fields(cart_id = %self.cart_id, product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: ProductId) {
        if let Err(e) = self
            .api
            .add_item(self.cart_id, CartItemInput::single(product_id))
            .await
        {
            error!(error = %e, "Failed to add product to cart");
            return;
        }

        self.load_cart().await;
    }

    /// Remove a line item, then refetch the cart.
    ///
    /// If the remove request fails the cart is not refetched and stays as it was.
    #[instrument(skip(self), fields(cart_id = %self.cart_id, item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: CartItemId) {
        if let Err(e) = self.api.remove_item(self.cart_id, item_id).await {
            error!(error = %e, "Failed to remove item from cart");
            return;
        }

        self.load_cart().await;
    }

    /// Convert the cart into an order.
    ///
    /// On success the notifier confirms the order to the user and, once that
    /// returns, the cart is refetched (the backend starts a fresh one). On
    /// failure only the log records it: no confirmation, no refetch.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn checkout(&self) {
        if let Err(e) = self.api.create_order_from_cart(self.cart_id).await {
            error!(error = %e, "Checkout failed");
            return;
        }

        self.notifier.order_placed().await;
        self.load_cart().await;
    }
}
