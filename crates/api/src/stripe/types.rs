//! Stripe wire types.
//!
//! Only the fields this backend reads are modeled; Stripe objects carry far
//! more and serde skips the rest.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::StripeError;
use crate::models::{OrderItem, ShippingAddress};

/// A Stripe Checkout Session, as returned by create and retrieve.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page URL. Present on freshly created sessions.
    pub url: Option<String>,
    /// "paid", "unpaid" or "no_payment_required".
    pub payment_status: String,
    pub payment_intent: Option<String>,
    pub customer_email: Option<String>,
    /// Total in minor units (paise).
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    /// Whether Stripe reports this session as settled.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// A Stripe Payment Intent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
}

/// Order context carried through Stripe in the session metadata.
///
/// The checkout endpoint writes this; reconciliation (webhook or verify)
/// reads it back to rebuild the order without trusting the client again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMetadata {
    pub user_id: String,
    pub cart: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl CheckoutMetadata {
    /// Serialize into Stripe metadata key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Metadata` if the cart or address fail to
    /// serialize, which only happens on pathological inputs.
    pub fn encode(&self) -> Result<Vec<(String, String)>, StripeError> {
        let cart = serde_json::to_string(&self.cart)
            .map_err(|e| StripeError::Metadata(format!("cart: {e}")))?;
        let address = serde_json::to_string(&self.shipping_address)
            .map_err(|e| StripeError::Metadata(format!("shipping address: {e}")))?;

        Ok(vec![
            ("metadata[userId]".to_string(), self.user_id.clone()),
            ("metadata[cart]".to_string(), cart),
            ("metadata[shippingAddress]".to_string(), address),
            ("metadata[subtotal]".to_string(), self.subtotal.to_string()),
            ("metadata[shipping]".to_string(), self.shipping.to_string()),
            ("metadata[total]".to_string(), self.total.to_string()),
        ])
    }

    /// Rebuild from session metadata.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Metadata` if the cart or shipping address keys
    /// are absent or unparseable. Missing amounts default to zero, matching
    /// how lenient the metadata producer has historically been.
    pub fn decode(metadata: &HashMap<String, String>) -> Result<Self, StripeError> {
        let cart_json = metadata
            .get("cart")
            .ok_or_else(|| StripeError::Metadata("missing cart".to_string()))?;
        let address_json = metadata
            .get("shippingAddress")
            .ok_or_else(|| StripeError::Metadata("missing shippingAddress".to_string()))?;

        let cart: Vec<OrderItem> = serde_json::from_str(cart_json)
            .map_err(|e| StripeError::Metadata(format!("cart: {e}")))?;
        let shipping_address: ShippingAddress = serde_json::from_str(address_json)
            .map_err(|e| StripeError::Metadata(format!("shipping address: {e}")))?;

        Ok(Self {
            user_id: metadata.get("userId").cloned().unwrap_or_default(),
            cart,
            shipping_address,
            subtotal: decode_amount(metadata, "subtotal"),
            shipping: decode_amount(metadata, "shipping"),
            total: decode_amount(metadata, "total"),
        })
    }
}

fn decode_amount(metadata: &HashMap<String, String>, key: &str) -> Decimal {
    metadata
        .get(key)
        .and_then(|v| v.parse::<Decimal>().ok())
        .unwrap_or_default()
}
