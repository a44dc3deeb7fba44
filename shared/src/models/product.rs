//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product
///
/// Prices are whole CFA francs (XOF has no subunit).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub long_description: Option<String>,
    pub price: i64,
    /// Price before the flash-sale discount
    pub original_price: Option<i64>,
    pub category: String,
    pub stock_quantity: i64,
    /// Always `stock_quantity > 0`
    pub in_stock: bool,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub warranty: Option<String>,
    pub delivery: Option<String>,
    pub installation: bool,
    pub is_new: bool,
    pub is_promo: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    /// Whole-percent discount against `original_price`, if it is a real markdown
    pub fn discount_percent(&self) -> Option<i64> {
        let original = self.original_price?;
        if original <= self.price || original <= 0 {
            return None;
        }
        Some((original - self.price) * 100 / original)
    }
}

/// Derived in-stock flag
pub fn in_stock(stock_quantity: i64) -> bool {
    stock_quantity > 0
}

/// Product reference embedded in order items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub long_description: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub category: String,
    pub stock_quantity: i64,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub warranty: Option<String>,
    pub delivery: Option<String>,
    pub installation: bool,
    pub is_new: bool,
    pub is_promo: bool,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub category: Option<String>,
    pub stock_quantity: Option<i64>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub warranty: Option<String>,
    pub delivery: Option<String>,
    pub installation: Option<bool>,
    pub is_new: Option<bool>,
    pub is_promo: Option<bool>,
}

/// Catalog listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub promo: Option<bool>,
    pub new: Option<bool>,
    pub in_stock: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, original_price: Option<i64>) -> Product {
        Product {
            id: 1,
            name: "Climatiseur".to_string(),
            description: "12000 BTU".to_string(),
            long_description: None,
            price,
            original_price,
            category: "Électroménager".to_string(),
            stock_quantity: 4,
            in_stock: true,
            images: vec![],
            features: vec![],
            warranty: None,
            delivery: None,
            installation: false,
            is_new: false,
            is_promo: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(product(75_000, Some(100_000)).discount_percent(), Some(25));
        assert_eq!(product(100_000, Some(100_000)).discount_percent(), None);
        assert_eq!(product(100_000, None).discount_percent(), None);
    }

    #[test]
    fn test_in_stock() {
        assert!(in_stock(1));
        assert!(!in_stock(0));
    }

    #[test]
    fn test_product_create_defaults() {
        let create: ProductCreate =
            serde_json::from_str(r#"{"name":"Radio","price":5000,"stockQuantity":2}"#).unwrap();
        assert_eq!(create.price, 5000);
        assert_eq!(create.stock_quantity, 2);
        assert!(create.images.is_empty());
        assert!(!create.is_promo);
    }
}
