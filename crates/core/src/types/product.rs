//! Product catalogue types.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::lenient;
use super::price::Price;

/// A product as listed by the backend. Read-only for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    /// Free-text description; `null` on the wire becomes empty.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Category the product belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Stock availability, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// One page of the product listing (the "content envelope").
///
/// Only `content` is consumed; paging metadata the backend adds is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page, in server order.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub content: Vec<Product>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_page_preserves_server_order() {
        let json = r#"{
            "content": [
                {"id": 3, "name": "Tea", "description": "Black tea", "price": 4.5},
                {"id": 1, "name": "Mug", "description": "Ceramic", "price": 12},
                {"id": 2, "name": "Spoon", "description": "Steel", "price": 1.25}
            ],
            "totalElements": 3,
            "number": 0
        }"#;

        let page: ProductPage = serde_json::from_str(json).unwrap();
        let ids: Vec<i64> = page.content.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(page.content[1].price, Price::from_hundredths(1200));
    }

    #[test]
    fn test_product_page_without_content() {
        let page: ProductPage = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
    }

    #[test]
    fn test_product_optional_fields() {
        let json = r#"{
            "id": 7,
            "name": "Kettle",
            "description": "Electric",
            "price": 39.9,
            "imageUrl": "https://img.example/kettle.png",
            "categoryId": 2,
            "inStock": false
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.image_url.as_deref(), Some("https://img.example/kettle.png"));
        assert_eq!(product.category_id, Some(CategoryId::new(2)));
        assert_eq!(product.in_stock, Some(false));
    }

    #[test]
    fn test_product_missing_text_fields_default_to_empty() {
        let product: Product = serde_json::from_str(r#"{"id": 1, "price": 2}"#).unwrap();
        assert!(product.name.is_empty());
        assert!(product.description.is_empty());
        assert_eq!(product.image_url, None);
    }

    #[test]
    fn test_product_without_price_is_dropped_from_page() {
        let json = r#"{"content": [{"id": 1, "name": "No price"}, {"id": 2, "price": 3}]}"#;
        let page: ProductPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, ProductId::new(2));
    }

    #[test]
    fn test_product_with_null_fields_is_kept() {
        let json = r#"{"content": [
            {"id": 1, "name": "Tea", "description": null, "price": 4.5,
             "imageUrl": null, "categoryId": null, "inStock": null},
            {"id": 2, "name": "Mug", "description": "Ceramic", "price": 12}
        ]}"#;
        let page: ProductPage = serde_json::from_str(json).unwrap();

        assert_eq!(page.content.len(), 2);
        let tea = &page.content[0];
        assert_eq!(tea.name, "Tea");
        assert!(tea.description.is_empty());
        assert_eq!(tea.image_url, None);
        assert_eq!(tea.category_id, None);
        assert_eq!(tea.in_stock, None);
    }

    #[test]
    fn test_product_with_null_name() {
        let product: Product =
            serde_json::from_str(r#"{"id": 3, "name": null, "price": 1}"#).unwrap();
        assert!(product.name.is_empty());
    }
}
