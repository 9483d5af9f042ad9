//! Order domain model.
//!
//! Orders denormalize the purchased items and shipping address as JSON
//! snapshots, so later product edits never rewrite order history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use soundbeatx_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus};

/// A single purchased line item, captured at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Cart-side identifier, opaque to the backend.
    pub id: String,
    /// Catalog product id, when the item maps to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub name: String,
    /// Unit price in rupees at time of purchase.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderItem {
    /// Line total for this item.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Shipping address snapshot stored with each order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    /// Recipient name. Older clients send this as `fullName`.
    #[serde(alias = "fullName")]
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "India".to_string()
}

/// A persisted order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    /// Buyer identity: an account id, an email, or "guest".
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    /// Stripe payment intent id; uniqueness key for online orders.
    pub stripe_payment_intent_id: Option<String>,
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to insert a new order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub stripe_payment_intent_id: Option<String>,
    pub stripe_session_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: "cart-1".to_string(),
            product_id: None,
            name: "Boat Airdopes 131 Pro".to_string(),
            price: dec!(1299),
            quantity: 2,
            image: None,
        };
        assert_eq!(item.line_total(), dec!(2598));
    }

    #[test]
    fn test_item_accepts_numeric_price() {
        let item: OrderItem = serde_json::from_value(serde_json::json!({
            "id": "cart-1",
            "name": "Boat Rockerz 255 Pro",
            "price": 999.0,
            "quantity": 1
        }))
        .unwrap();
        assert_eq!(item.price, dec!(999));
        assert!(item.product_id.is_none());
    }

    #[test]
    fn test_item_serializes_price_as_number() {
        let item = OrderItem {
            id: "cart-1".to_string(),
            product_id: Some("64b7f3a2c9e77a0012345678".to_string()),
            name: "Boat Stone 1000".to_string(),
            price: dec!(1999),
            quantity: 1,
            image: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert!(value["price"].is_number());
        assert_eq!(value["productId"], "64b7f3a2c9e77a0012345678");
    }

    #[test]
    fn test_address_accepts_full_name_alias() {
        let addr: ShippingAddress = serde_json::from_value(serde_json::json!({
            "fullName": "Asha Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "address": "12 MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001"
        }))
        .unwrap();
        assert_eq!(addr.name, "Asha Rao");
        assert_eq!(addr.country, "India");
    }
}
