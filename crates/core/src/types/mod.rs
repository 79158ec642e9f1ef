//! Core types for the shop storefront.
//!
//! This module provides type-safe wrappers for the backend's entities.

pub mod cart;
pub mod id;
pub mod lenient;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{Cart, CartItem, CartItemInput};
pub use id::*;
pub use price::Price;
pub use product::{Product, ProductPage};
pub use status::CartStatus;
