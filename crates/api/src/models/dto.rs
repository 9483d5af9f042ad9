//! Wire DTOs for API responses.
//!
//! The storage layer uses snake_case columns; the JSON surface is camelCase.
//! All renaming happens here and only here, so handlers never hand-map field
//! names. Money fields serialize as JSON numbers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::admin_user::AdminUser;
use super::order::{Order, OrderItem, ShippingAddress};
use super::product::Product;

/// Order as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub subtotal: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub shipping: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.into_inner(),
            user_id: order.user_id,
            items: order.items,
            shipping_address: order.shipping_address,
            subtotal: order.subtotal,
            shipping: order.shipping,
            total: order.total,
            payment_method: order.payment_method.to_string(),
            payment_status: order.payment_status.to_string(),
            order_status: order.order_status.to_string(),
            stripe_payment_intent_id: order.stripe_payment_intent_id,
            stripe_session_id: order.stripe_session_id,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Product as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.into_inner(),
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            image: product.image,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Admin account as returned by auth endpoints. No password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<AdminUser> for AdminDto {
    fn from(admin: AdminUser) -> Self {
        Self {
            id: admin.id.into_inner(),
            username: admin.username,
            email: admin.email.into_inner(),
            role: admin.role.to_string(),
        }
    }
}

/// Pagination envelope for admin list endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Build pagination metadata from a total row count.
    #[must_use]
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1).div_euclid(limit)
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::dec;
    use soundbeatx_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus};

    #[test]
    fn test_pagination_rounds_up() {
        let p = Pagination::new(1, 20, 41);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::new(1, 20, 40);
        assert_eq!(p.total_pages, 2);

        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn test_order_dto_wire_shape() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            user_id: "buyer@example.com".to_string(),
            items: vec![],
            shipping_address: ShippingAddress {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
                address: "12 MG Road".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                pincode: "560001".to_string(),
                country: "India".to_string(),
            },
            subtotal: dec!(1299),
            shipping: dec!(0),
            total: dec!(1299),
            payment_method: PaymentMethod::Online,
            payment_status: PaymentStatus::Paid,
            order_status: OrderStatus::Pending,
            stripe_payment_intent_id: Some("pi_123".to_string()),
            stripe_session_id: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(OrderDto::from(order)).unwrap();
        assert_eq!(value["paymentMethod"], "Online");
        assert_eq!(value["paymentStatus"], "Paid");
        assert_eq!(value["orderStatus"], "Pending");
        assert_eq!(value["stripePaymentIntentId"], "pi_123");
        assert!(value["total"].is_number());
        assert!(value.get("stripeSessionId").is_none());
        assert!(value.get("user_id").is_none());
    }
}
