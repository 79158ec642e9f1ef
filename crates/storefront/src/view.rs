//! Text views of the storefront state.
//!
//! Views are built from state snapshots and rendered with `Display`, so the
//! terminal front end never formats entities itself.

use std::collections::HashMap;
use std::fmt;

use shop_core::{Cart, CartItem, Price, Product, ProductId};

/// Product list display data.
#[derive(Debug, Clone)]
pub struct ProductListView {
    pub items: Vec<ProductView>,
}

/// Product display data.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub out_of_stock: bool,
}

/// Cart display data.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    /// Sum of line totals; `None` while any line total is unknown.
    pub subtotal: Option<String>,
}

/// Cart line item display data.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub product_id: ProductId,
    /// Product name, when the product is on the loaded page.
    pub title: Option<String>,
    pub quantity: u32,
    pub line_price: Option<String>,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&[Product]> for ProductListView {
    fn from(products: &[Product]) -> Self {
        Self {
            items: products.iter().map(ProductView::from).collect(),
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            out_of_stock: product.in_stock == Some(false),
        }
    }
}

impl CartView {
    /// Build a cart view, resolving names and prices from the loaded products.
    #[must_use]
    pub fn new(cart: &Cart, products: &[Product]) -> Self {
        let catalogue: HashMap<ProductId, &Product> =
            products.iter().map(|product| (product.id, product)).collect();

        let line_totals: Vec<Option<Price>> = cart
            .items
            .iter()
            .map(|item| line_total(item, &catalogue))
            .collect();

        let subtotal = line_totals
            .iter()
            .copied()
            .collect::<Option<Vec<Price>>>()
            .and_then(Price::checked_sum)
            .filter(|_| !cart.is_empty())
            .map(|total| total.to_string());

        Self {
            items: cart
                .items
                .iter()
                .zip(&line_totals)
                .map(|(item, total)| CartItemView {
                    id: item.id.to_string(),
                    product_id: item.product_id,
                    title: catalogue.get(&item.product_id).map(|p| p.name.clone()),
                    quantity: item.quantity.get(),
                    line_price: total.map(|t| t.to_string()),
                })
                .collect(),
            item_count: cart.total_quantity(),
            subtotal,
        }
    }
}

/// Unit price times quantity, or `None` if the product is unknown or the
/// total overflows.
fn line_total(item: &CartItem, catalogue: &HashMap<ProductId, &Product>) -> Option<Price> {
    catalogue
        .get(&item.product_id)
        .and_then(|product| product.price.checked_mul(item.quantity.get()))
}

// =============================================================================
// Rendering
// =============================================================================

impl fmt::Display for ProductListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Products")?;
        if self.items.is_empty() {
            return writeln!(f, "  No products available");
        }
        for item in &self.items {
            write!(f, "  [{}] {} - {}", item.id, item.name, item.price)?;
            if item.out_of_stock {
                write!(f, " (out of stock)")?;
            }
            writeln!(f)?;
            if !item.description.is_empty() {
                writeln!(f, "      {}", item.description)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for CartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            writeln!(f, "Cart")?;
            return writeln!(f, "  Your cart is empty");
        }

        let unit = if self.item_count == 1 { "item" } else { "items" };
        writeln!(f, "Cart ({} {unit})", self.item_count)?;
        for item in &self.items {
            write!(f, "  #{} Product #{}", item.id, item.product_id)?;
            if let Some(title) = &item.title {
                write!(f, " {title}")?;
            }
            write!(f, " - Qty: {}", item.quantity)?;
            if let Some(price) = &item.line_price {
                write!(f, " ({price})")?;
            }
            writeln!(f)?;
        }
        if let Some(subtotal) = &self.subtotal {
            writeln!(f, "  Subtotal: {subtotal}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn products() -> Vec<Product> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "Tea", "description": "Black tea", "price": 4.5},
                {"id": 2, "name": "Mug", "description": "", "price": 12, "inStock": false}
            ]"#,
        )
        .unwrap()
    }

    fn cart(json: &str) -> Cart {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_product_list_rendering() {
        let products = products();
        let rendered = ProductListView::from(products.as_slice()).to_string();
        assert_eq!(
            rendered,
            "Products\n  [1] Tea - 4.50\n      Black tea\n  [2] Mug - 12.00 (out of stock)\n"
        );
    }

    #[test]
    fn test_empty_product_list() {
        let rendered = ProductListView::from(&[] as &[Product]).to_string();
        assert!(rendered.contains("No products available"));
    }

    #[test]
    fn test_empty_cart_rendering() {
        let view = CartView::new(&Cart::empty(), &products());
        assert_eq!(view.to_string(), "Cart\n  Your cart is empty\n");
        assert!(view.subtotal.is_none());
    }

    #[test]
    fn test_cart_with_known_products() {
        let cart = cart(
            r#"{"items": [
                {"id": 10, "productId": 1, "quantity": 2},
                {"id": 11, "productId": 2, "quantity": 1}
            ]}"#,
        );
        let view = CartView::new(&cart, &products());

        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal.as_deref(), Some("21.00"));
        assert_eq!(
            view.to_string(),
            "Cart (3 items)\n  #10 Product #1 Tea - Qty: 2 (9.00)\n  #11 Product #2 Mug - Qty: 1 (12.00)\n  Subtotal: 21.00\n"
        );
    }

    #[test]
    fn test_cart_with_unknown_product_has_no_subtotal() {
        let cart = cart(r#"{"items": [{"id": 10, "productId": 99, "quantity": 1}]}"#);
        let view = CartView::new(&cart, &products());

        assert!(view.subtotal.is_none());
        assert_eq!(
            view.to_string(),
            "Cart (1 item)\n  #10 Product #99 - Qty: 1\n"
        );
    }

    #[test]
    fn test_overflowing_totals_are_omitted() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[{"id": 1, "name": "Gold", "price": 5e28}, {"id": 2, "name": "Tea", "price": 4.5}]"#,
        )
        .unwrap();

        let doubled = cart(r#"{"items": [{"id": 10, "productId": 1, "quantity": 2}]}"#);
        let view = CartView::new(&doubled, &products);
        assert!(view.items[0].line_price.is_none());
        assert!(view.subtotal.is_none());
        assert_eq!(view.to_string(), "Cart (2 items)\n  #10 Product #1 Gold - Qty: 2\n");

        let two_lines = cart(
            r#"{"items": [
                {"id": 10, "productId": 1, "quantity": 1},
                {"id": 11, "productId": 1, "quantity": 1}
            ]}"#,
        );
        let view = CartView::new(&two_lines, &products);
        assert!(view.items.iter().all(|item| item.line_price.is_some()));
        assert!(view.subtotal.is_none());
    }
}
