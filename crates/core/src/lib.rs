//! Shop Core - Shared entity types.
//!
//! The backend owns every entity; this crate only describes their wire shape
//! so the storefront client can deserialize them.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Decoding is
//! lenient where the backend is known to omit collections: a missing, `null`
//! or non-array `items`/`content` field becomes an empty vector.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, carts and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
