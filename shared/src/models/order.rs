//! Order Model

use serde::{Deserialize, Serialize};

use super::product::ProductSummary;
use super::user::UserSummary;

/// Order lifecycle state
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
    Expired,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "REJECTED" => Some(Self::Rejected),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line with the unit price frozen at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: i64,
    pub product: Option<ProductSummary>,
}

impl OrderItem {
    /// `None` on overflow
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    /// Mobile-money transaction reference
    pub payment_ref: Option<String>,
    pub rejection_reason: Option<String>,
    pub expires_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub items: Vec<OrderItem>,
    /// Only filled in for ADMIN/MANAGER callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl Order {
    /// Sum of the captured line prices; equals `total` for every stored order
    pub fn items_total(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.line_total()?))
    }
}

/// One cart line submitted at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i64,
}

/// Checkout payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
}

/// Confirm payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfirmOrderRequest {
    pub payment_ref: Option<String>,
}

/// Reject payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectOrderRequest {
    pub rejection_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_db_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Rejected,
            OrderStatus::Expired,
        ] {
            assert_eq!(OrderStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_db("CANCELLED"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Confirmed.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
    }

    #[test]
    fn test_order_create_wire_format() {
        let json = r#"{
            "items": [{"productId": 12, "quantity": 2}],
            "customerName": "Moussa Traoré",
            "customerEmail": "moussa@example.ml",
            "customerPhone": "+22370000000",
            "customerAddress": "Bamako, ACI 2000"
        }"#;
        let create: OrderCreate = serde_json::from_str(json).unwrap();
        assert_eq!(create.items.len(), 1);
        assert_eq!(create.items[0].product_id, 12);
        assert_eq!(create.customer_phone, "+22370000000");
    }

    #[test]
    fn test_reject_request_missing_reason() {
        let req: RejectOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.rejection_reason.is_none());
    }

    #[test]
    fn test_items_total() {
        let item = |price, quantity| OrderItem {
            id: 0,
            order_id: 1,
            product_id: 1,
            quantity,
            price,
            product: None,
        };
        let order = Order {
            id: 1,
            user_id: 1,
            total: 35_000,
            status: OrderStatus::Pending,
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            customer_address: String::new(),
            payment_ref: None,
            rejection_reason: None,
            expires_at: 0,
            created_at: 0,
            updated_at: 0,
            items: vec![item(10_000, 3), item(5_000, 1)],
            user: None,
        };
        assert_eq!(order.items_total(), Some(order.total));

        let mut huge = order.clone();
        huge.items = vec![item(i64::MAX / 2, 3)];
        assert_eq!(huge.items_total(), None);
        huge.items = vec![item(i64::MAX / 2, 1), item(i64::MAX / 2, 1), item(10, 1)];
        assert_eq!(huge.items_total(), None);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("user").is_none());
    }
}
