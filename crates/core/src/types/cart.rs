//! Cart types.
//!
//! The cart is always refetched whole from the backend after a mutation, so
//! these types are plain snapshots with no merge logic.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::{CartId, CartItemId, CustomerId, ProductId};
use super::lenient;
use super::status::CartStatus;

/// A snapshot of the server-side cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CartId>,
    /// Customer owning the cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// Line items in server order. Never absent.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub items: Vec<CartItem>,
    /// Cart lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CartStatus>,
}

impl Cart {
    /// An empty cart, used before the first successful load.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            id: None,
            customer_id: None,
            items: Vec::new(),
            status: None,
        }
    }

    /// Returns `true` if the cart has no line items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Find the line item holding a product, if any.
    #[must_use]
    pub fn item_for_product(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }
}

/// A cart line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line item ID.
    pub id: CartItemId,
    /// Referenced product (not owned by the cart).
    pub product_id: ProductId,
    /// Number of units; always positive.
    pub quantity: NonZeroU32,
}

/// Request body for adding a product to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    /// Product to add.
    pub product_id: ProductId,
    /// Units to add.
    pub quantity: NonZeroU32,
}

impl CartItemInput {
    /// A single unit of a product.
    #[must_use]
    pub const fn single(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: NonZeroU32::MIN,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_without_items_field() {
        let cart: Cart = serde_json::from_str(r#"{"id": 1, "customerId": 1}"#).unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.id, Some(CartId::new(1)));
    }

    #[test]
    fn test_cart_with_null_items() {
        let cart: Cart = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_with_malformed_items() {
        let cart: Cart = serde_json::from_str(r#"{"items": 5}"#).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_drops_non_positive_quantities() {
        let json = r#"{"items": [
            {"id": 1, "productId": 10, "quantity": 2},
            {"id": 2, "productId": 11, "quantity": 0},
            {"id": 3, "productId": 12, "quantity": -1}
        ]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_cart_status_and_lookup() {
        let json = r#"{
            "id": 1,
            "status": "ACTIVE",
            "items": [
                {"id": 5, "productId": 10, "quantity": 1},
                {"id": 6, "productId": 20, "quantity": 3}
            ]
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.status, Some(CartStatus::Active));
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(
            cart.item_for_product(ProductId::new(20)).map(|i| i.id),
            Some(CartItemId::new(6))
        );
        assert!(cart.item_for_product(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_cart_item_input_wire_shape() {
        let input = CartItemInput::single(ProductId::new(42));
        let json = serde_json::to_value(input).unwrap();
        assert_eq!(json, serde_json::json!({"productId": 42, "quantity": 1}));
    }

    #[test]
    fn test_empty_cart_default() {
        assert_eq!(Cart::empty(), Cart::default());
    }
}
