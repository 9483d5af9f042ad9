//! Checkout and payment reconciliation logic.
//!
//! Two paths can learn about a completed Stripe payment: the webhook and
//! the browser landing on the success page. Both funnel through
//! [`find_or_create_order`], and the storage layer's unique index on the
//! payment intent guarantees only one of them creates the order.

use rust_decimal::Decimal;
use thiserror::Error;

use soundbeatx_core::{PaymentMethod, PaymentStatus};

use crate::db::OrderRepository;
use crate::error::ApiError;
use crate::models::{Order, OrderDraft, OrderItem};
use crate::stripe::{CheckoutMetadata, CheckoutSession, StripeError};

/// Client-submitted order data that failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cart is required and cannot be empty")]
    EmptyCart,
    #[error("Item quantity must be at least 1")]
    ZeroQuantity,
    #[error("Item price cannot be negative")]
    NegativePrice,
    #[error("Shipping cannot be negative")]
    NegativeShipping,
    #[error("Subtotal does not match cart items")]
    SubtotalMismatch,
    #[error("Total does not match subtotal plus shipping")]
    TotalMismatch,
}

/// Validate a cart: non-empty, positive quantities, non-negative prices.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate_cart(items: &[OrderItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    for item in items {
        if item.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if item.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }
    }
    Ok(())
}

/// Validate client-submitted totals against the cart.
///
/// Clients compute their own subtotal and total for display; the server
/// recomputes both and rejects any disagreement rather than storing
/// whatever the client claims.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate_totals(
    items: &[OrderItem],
    subtotal: Decimal,
    shipping: Decimal,
    total: Decimal,
) -> Result<(), ValidationError> {
    validate_cart(items)?;

    if shipping < Decimal::ZERO {
        return Err(ValidationError::NegativeShipping);
    }

    let computed: Decimal = items.iter().map(OrderItem::line_total).sum();
    if computed != subtotal {
        return Err(ValidationError::SubtotalMismatch);
    }
    if subtotal + shipping != total {
        return Err(ValidationError::TotalMismatch);
    }
    Ok(())
}

/// Payment status a freshly created order starts in.
///
/// COD settles on delivery; anything else arrives here already charged.
#[must_use]
pub const fn initial_payment_status(method: PaymentMethod) -> PaymentStatus {
    match method {
        PaymentMethod::Cod => PaymentStatus::Pending,
        PaymentMethod::Online => PaymentStatus::Paid,
    }
}

/// Build an order draft from a paid checkout session.
///
/// The buyer identity falls back through metadata, the session email, and
/// finally "guest". A zero total in the metadata falls back to the
/// session's settled amount.
///
/// # Errors
///
/// Returns `PaymentNotCompleted` for unpaid sessions and `Metadata` when
/// the session lacks the context needed to rebuild the order.
pub fn order_from_session(session: &CheckoutSession) -> Result<OrderDraft, StripeError> {
    if !session.is_paid() {
        return Err(StripeError::PaymentNotCompleted);
    }

    let payment_intent = session
        .payment_intent
        .clone()
        .ok_or_else(|| StripeError::Metadata("paid session without payment intent".to_string()))?;

    let metadata = CheckoutMetadata::decode(&session.metadata)?;

    let user_id = if metadata.user_id.is_empty() {
        session
            .customer_email
            .clone()
            .unwrap_or_else(|| "guest".to_string())
    } else {
        metadata.user_id
    };

    let total = if metadata.total.is_zero() {
        session
            .amount_total
            .map_or(Decimal::ZERO, |minor| Decimal::from(minor) / Decimal::from(100))
    } else {
        metadata.total
    };

    Ok(OrderDraft {
        user_id,
        items: metadata.cart,
        shipping_address: metadata.shipping_address,
        subtotal: metadata.subtotal,
        shipping: metadata.shipping,
        total,
        payment_method: PaymentMethod::Online,
        payment_status: PaymentStatus::Paid,
        stripe_payment_intent_id: Some(payment_intent),
        stripe_session_id: Some(session.id.clone()),
    })
}

/// Reconcile a paid session into an order, idempotently.
///
/// Returns the order plus whether this call created it. Safe to invoke
/// concurrently from the webhook and the redirect handler.
///
/// # Errors
///
/// Returns `ApiError` for unpaid sessions, broken metadata, or storage
/// failures.
pub async fn find_or_create_order(
    repo: &OrderRepository<'_>,
    session: &CheckoutSession,
) -> Result<(Order, bool), ApiError> {
    let draft = order_from_session(session)?;
    let (order, created) = repo.create_idempotent(&draft).await?;

    if created {
        tracing::info!(
            order_id = %order.id,
            session_id = %session.id,
            "order created from checkout session"
        );
    } else {
        tracing::debug!(
            order_id = %order.id,
            session_id = %session.id,
            "order already reconciled"
        );
    }

    Ok((order, created))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use std::collections::HashMap;

    use crate::models::ShippingAddress;

    fn item(price: Decimal, quantity: u32) -> OrderItem {
        OrderItem {
            id: "cart-1".to_string(),
            product_id: None,
            name: "Boat Rockerz 255 Pro".to_string(),
            price,
            quantity,
            image: None,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            country: "India".to_string(),
        }
    }

    fn paid_session(metadata: &CheckoutMetadata) -> CheckoutSession {
        let stored: HashMap<String, String> = metadata
            .encode()
            .unwrap()
            .into_iter()
            .map(|(k, v)| {
                let key = k
                    .strip_prefix("metadata[")
                    .and_then(|k| k.strip_suffix(']'))
                    .unwrap()
                    .to_string();
                (key, v)
            })
            .collect();

        CheckoutSession {
            id: "cs_test_123".to_string(),
            url: None,
            payment_status: "paid".to_string(),
            payment_intent: Some("pi_test_123".to_string()),
            customer_email: Some("asha@example.com".to_string()),
            amount_total: Some(199_800),
            metadata: stored,
        }
    }

    #[test]
    fn test_cod_orders_start_payment_pending() {
        assert_eq!(
            initial_payment_status(PaymentMethod::Cod),
            PaymentStatus::Pending
        );
        assert_eq!(
            initial_payment_status(PaymentMethod::Online),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_validate_totals_accepts_consistent_order() {
        let items = vec![item(dec!(999), 2)];
        assert!(validate_totals(&items, dec!(1998), dec!(0), dec!(1998)).is_ok());
        assert!(validate_totals(&items, dec!(1998), dec!(50), dec!(2048)).is_ok());
    }

    #[test]
    fn test_validate_totals_rejects_mismatches() {
        let items = vec![item(dec!(999), 2)];
        assert_eq!(
            validate_totals(&items, dec!(999), dec!(0), dec!(999)),
            Err(ValidationError::SubtotalMismatch)
        );
        assert_eq!(
            validate_totals(&items, dec!(1998), dec!(50), dec!(1998)),
            Err(ValidationError::TotalMismatch)
        );
        assert_eq!(
            validate_totals(&items, dec!(1998), dec!(-1), dec!(1997)),
            Err(ValidationError::NegativeShipping)
        );
    }

    #[test]
    fn test_validate_cart_rejections() {
        assert_eq!(validate_cart(&[]), Err(ValidationError::EmptyCart));
        assert_eq!(
            validate_cart(&[item(dec!(999), 0)]),
            Err(ValidationError::ZeroQuantity)
        );
        assert_eq!(
            validate_cart(&[item(dec!(-1), 1)]),
            Err(ValidationError::NegativePrice)
        );
    }

    #[test]
    fn test_order_from_paid_session() {
        let metadata = CheckoutMetadata {
            user_id: "user-42".to_string(),
            cart: vec![item(dec!(999), 2)],
            shipping_address: address(),
            subtotal: dec!(1998),
            shipping: dec!(0),
            total: dec!(1998),
        };
        let session = paid_session(&metadata);

        let draft = order_from_session(&session).unwrap();
        assert_eq!(draft.user_id, "user-42");
        assert_eq!(draft.total, dec!(1998));
        assert_eq!(draft.payment_method, PaymentMethod::Online);
        assert_eq!(draft.payment_status, PaymentStatus::Paid);
        assert_eq!(draft.stripe_payment_intent_id.as_deref(), Some("pi_test_123"));
        assert_eq!(draft.stripe_session_id.as_deref(), Some("cs_test_123"));
    }

    #[test]
    fn test_unpaid_session_rejected() {
        let metadata = CheckoutMetadata {
            user_id: "user-42".to_string(),
            cart: vec![item(dec!(999), 2)],
            shipping_address: address(),
            subtotal: dec!(1998),
            shipping: dec!(0),
            total: dec!(1998),
        };
        let mut session = paid_session(&metadata);
        session.payment_status = "unpaid".to_string();

        assert!(matches!(
            order_from_session(&session),
            Err(StripeError::PaymentNotCompleted)
        ));
    }

    #[test]
    fn test_user_falls_back_to_session_email() {
        let metadata = CheckoutMetadata {
            user_id: String::new(),
            cart: vec![item(dec!(999), 2)],
            shipping_address: address(),
            subtotal: dec!(1998),
            shipping: dec!(0),
            total: dec!(1998),
        };
        let session = paid_session(&metadata);

        let draft = order_from_session(&session).unwrap();
        assert_eq!(draft.user_id, "asha@example.com");
    }

    #[test]
    fn test_guest_fallback_without_email() {
        let metadata = CheckoutMetadata {
            user_id: String::new(),
            cart: vec![item(dec!(999), 2)],
            shipping_address: address(),
            subtotal: dec!(1998),
            shipping: dec!(0),
            total: dec!(1998),
        };
        let mut session = paid_session(&metadata);
        session.customer_email = None;

        let draft = order_from_session(&session).unwrap();
        assert_eq!(draft.user_id, "guest");
    }

    #[test]
    fn test_total_falls_back_to_settled_amount() {
        let metadata = CheckoutMetadata {
            user_id: "user-42".to_string(),
            cart: vec![item(dec!(999), 2)],
            shipping_address: address(),
            subtotal: dec!(0),
            shipping: dec!(0),
            total: dec!(0),
        };
        let session = paid_session(&metadata);

        let draft = order_from_session(&session).unwrap();
        assert_eq!(draft.total, dec!(1998));
    }

    #[test]
    fn test_missing_metadata_rejected() {
        let mut session = paid_session(&CheckoutMetadata {
            user_id: "user-42".to_string(),
            cart: vec![item(dec!(999), 2)],
            shipping_address: address(),
            subtotal: dec!(1998),
            shipping: dec!(0),
            total: dec!(1998),
        });
        session.metadata.clear();

        assert!(matches!(
            order_from_session(&session),
            Err(StripeError::Metadata(_))
        ));
    }
}
