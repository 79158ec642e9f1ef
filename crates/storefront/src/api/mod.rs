//! REST client for the shop backend.
//!
//! # Architecture
//!
//! - One `reqwest::Client` per [`ApiClient`], reused for every call
//! - The backend is the source of truth - no caching, no local patching
//! - Every non-2xx status is a failure regardless of its code
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list products | GET | `/products?page={page}&size={size}` |
//! | get cart | GET | `/cart/{cartId}` |
//! | add item | POST | `/cart/{cartId}/items` |
//! | remove item | DELETE | `/cart/{cartId}/items/{itemId}` |
//! | checkout | POST | `/orders/from-cart/{cartId}` |
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(config.api_base_url.clone());
//!
//! let page = client.list_products(0, 10).await?;
//! client.add_item(config.cart_id, CartItemInput::single(page.content[0].id)).await?;
//! let cart = client.get_cart(config.cart_id).await?;
//! ```

mod client;

pub use client::ApiClient;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Maximum number of body characters kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, DNS, broken body stream).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: StatusCode,
        /// Backend error message, or a prefix of the raw body.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Status code of the response, for errors that have one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a status error from a response body.
    ///
    /// Uses the backend's `message` field when the body is an error payload,
    /// otherwise a truncated copy of the body, otherwise the status reason.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|payload| payload.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("no response body")
                        .to_string()
                } else {
                    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
                }
            });

        Self::Status { status, message }
    }
}

/// Error payload returned by the backend for failed requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Status name, e.g. `NOT_FOUND`.
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable error message.
    #[serde(default)]
    pub message: Option<String>,
}
