//! Status enums for backend entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a cart.
///
/// A cart is `Active` while items can be added and becomes `Ordered` once it
/// has been converted into an order. Values this client does not know about
/// decode as `Unknown` rather than failing the whole cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartStatus {
    /// Cart accepts new items.
    #[default]
    Active,
    /// Cart has been checked out.
    Ordered,
    /// Any status not listed above.
    #[serde(other)]
    Unknown,
}

impl CartStatus {
    /// Display label for the status.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Ordered => "Ordered",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_status_wire_names() {
        let status: CartStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(status, CartStatus::Active);

        let status: CartStatus = serde_json::from_str("\"ORDERED\"").unwrap();
        assert_eq!(status, CartStatus::Ordered);
    }

    #[test]
    fn test_cart_status_unknown_value() {
        let status: CartStatus = serde_json::from_str("\"ABANDONED\"").unwrap();
        assert_eq!(status, CartStatus::Unknown);
        assert_eq!(status.label(), "Unknown");
    }
}
