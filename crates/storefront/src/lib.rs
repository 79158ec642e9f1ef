//! Shop Storefront library.
//!
//! A thin client over the shop backend's REST API: it keeps the current
//! product page and cart, adds items, removes items and checks out. The
//! terminal binary is a front end over this library, allowing the network
//! contract to be tested against a mock backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_storefront::{LogNotifier, ShopConfig, Storefront};
//!
//! let config = ShopConfig::from_env()?;
//! let storefront = Storefront::new(&config, LogNotifier);
//!
//! storefront.refresh().await;
//! storefront.add_to_cart(ProductId::new(1)).await;
//! storefront.checkout().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notifier;
pub mod state;
pub mod terminal;
pub mod view;

pub use config::ShopConfig;
pub use notifier::{LogNotifier, Notifier};
pub use state::Storefront;
