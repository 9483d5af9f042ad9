//! Stripe integration: REST client, wire types and webhook verification.

pub mod client;
pub mod types;
pub mod webhook;

pub use client::{StripeClient, to_minor_units};
pub use types::{CheckoutMetadata, CheckoutSession, PaymentIntent};
pub use webhook::{WebhookEvent, verify_signature};

use thiserror::Error;

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Webhook signature did not verify.
    #[error("invalid webhook signature: {0}")]
    InvalidSignature(String),

    /// Checkout session is not in the `paid` state.
    #[error("Payment not completed")]
    PaymentNotCompleted,

    /// Session metadata is missing or malformed. The detail is for logs;
    /// clients get a fixed message.
    #[error("session metadata incomplete: {0}")]
    Metadata(String),

    /// Failed to parse a response or amount.
    #[error("Parse error: {0}")]
    Parse(String),
}
