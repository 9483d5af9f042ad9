//! Stripe REST client.
//!
//! Talks to the Stripe API directly over form-encoded REST. Only the three
//! calls the checkout flow needs are implemented.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};

use super::StripeError;
use super::types::{CheckoutMetadata, CheckoutSession, PaymentIntent};
use crate::config::StripeConfig;

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com/v1";

/// Settlement currency. Prices throughout are rupees; Stripe wants paise.
const CURRENCY: &str = "inr";

/// Convert a rupee amount to paise, rounding to the nearest unit.
///
/// # Errors
///
/// Returns `StripeError::Parse` if the amount does not fit in an `i64`
/// after scaling.
pub fn to_minor_units(amount: Decimal) -> Result<i64, StripeError> {
    (amount * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| StripeError::Parse(format!("amount out of range: {amount}")))
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: SecretString,
    frontend_url: String,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// `frontend_url` is the origin the hosted checkout page redirects back
    /// to after payment.
    #[must_use]
    pub fn new(config: &StripeConfig, frontend_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: config.secret_key.clone(),
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a hosted Checkout Session for a card payment.
    ///
    /// The order context travels in the session metadata so reconciliation
    /// can rebuild the order server-side.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails or Stripe rejects it.
    pub async fn create_checkout_session(
        &self,
        email: &str,
        metadata: &CheckoutMetadata,
    ) -> Result<CheckoutSession, StripeError> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "payment_method_types[0]".to_string(),
                "card".to_string(),
            ),
            (
                "success_url".to_string(),
                format!(
                    "{}/order-success?session_id={{CHECKOUT_SESSION_ID}}",
                    self.frontend_url
                ),
            ),
            (
                "cancel_url".to_string(),
                format!(
                    "{}/payment-failure?session_id={{CHECKOUT_SESSION_ID}}",
                    self.frontend_url
                ),
            ),
            ("customer_email".to_string(), email.to_string()),
            (
                "shipping_address_collection[allowed_countries][0]".to_string(),
                "IN".to_string(),
            ),
        ];

        for (i, item) in metadata.cart.iter().enumerate() {
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                CURRENCY.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            if let Some(image) = &item.image {
                params.push((
                    format!("line_items[{i}][price_data][product_data][images][0]"),
                    image.clone(),
                ));
            }
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                to_minor_units(item.price)?.to_string(),
            ));
            params.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        // Shipping rides along as its own line item
        if metadata.shipping > Decimal::ZERO {
            let i = metadata.cart.len();
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                CURRENCY.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                "Shipping".to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                to_minor_units(metadata.shipping)?.to_string(),
            ));
            params.push((format!("line_items[{i}][quantity]"), "1".to_string()));
        }

        params.extend(metadata.encode()?);

        self.post_form("checkout/sessions", &params).await
    }

    /// Fetch a Checkout Session by id.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails or Stripe rejects it.
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{BASE_URL}/checkout/sessions/{session_id}");
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create a Payment Intent for a card-element flow.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails or Stripe rejects it.
    pub async fn create_payment_intent(
        &self,
        amount: Decimal,
    ) -> Result<PaymentIntent, StripeError> {
        let params = [
            ("amount".to_string(), to_minor_units(amount)?.to_string()),
            ("currency".to_string(), CURRENCY.to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        self.post_form("payment_intents", &params).await
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, StripeError> {
        let url = format!("{BASE_URL}/{path}");
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("error")?
                        .get("message")?
                        .as_str()
                        .map(ToString::to_string)
                })
                .unwrap_or(body);
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_rupees_to_paise() {
        assert_eq!(to_minor_units(dec!(1299)).unwrap(), 129_900);
        assert_eq!(to_minor_units(dec!(0)).unwrap(), 0);
        assert_eq!(to_minor_units(dec!(49.99)).unwrap(), 4999);
        // Sub-paise amounts round to nearest
        assert_eq!(to_minor_units(dec!(10.005)).unwrap(), 1000);
        assert_eq!(to_minor_units(dec!(10.015)).unwrap(), 1002);
    }
}
