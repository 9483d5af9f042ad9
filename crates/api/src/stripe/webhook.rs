//! Stripe webhook signature verification.
//!
//! Stripe signs each delivery with an HMAC-SHA256 over
//! `"{timestamp}.{payload}"` and sends it in the `Stripe-Signature` header
//! as `t=<unix>,v1=<hex>`. Deliveries older than the tolerance window are
//! rejected to block replays.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use super::StripeError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a signed delivery, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// A verified webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

/// Event payload; the object shape depends on `event_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// `now` is the current Unix timestamp, passed in so the tolerance window
/// is testable.
///
/// # Errors
///
/// Returns `StripeError::InvalidSignature` if the header is malformed, the
/// timestamp falls outside the tolerance window, or no candidate signature
/// matches.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), StripeError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| {
                    StripeError::InvalidSignature("timestamp is not a number".to_string())
                })?);
            }
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| StripeError::InvalidSignature("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(StripeError::InvalidSignature(
            "missing v1 signature".to_string(),
        ));
    }

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(StripeError::InvalidSignature(
            "timestamp outside tolerance".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| StripeError::InvalidSignature(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    // Stripe may send several v1 candidates during secret rotation
    for candidate in signatures {
        let Ok(decoded) = hex::decode(candidate) else {
            continue;
        };
        if mac.clone().verify_slice(&decoded).is_ok() {
            return Ok(());
        }
    }

    Err(StripeError::InvalidSignature(
        "no matching signature".to_string(),
    ))
}

/// Verify and deserialize a webhook delivery in one step.
///
/// # Errors
///
/// Returns `StripeError::InvalidSignature` on verification failure, or
/// `StripeError::Parse` if the verified body is not a valid event.
pub fn parse_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<WebhookEvent, StripeError> {
    verify_signature(payload, header, secret, now)?;
    serde_json::from_slice(payload).map_err(|e| StripeError::Parse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test123secret456";

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    fn header_for(payload: &[u8], secret: &str, timestamp: i64) -> String {
        format!("t={timestamp},v1={}", sign(payload, secret, timestamp))
    }

    #[test]
    fn test_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = header_for(payload, SECRET, now);
        assert!(verify_signature(payload, &header, SECRET, now).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = 1_700_000_000;
        let header = header_for(payload, "wrong_secret", now);
        assert!(verify_signature(payload, &header, SECRET, now).is_err());
    }

    #[test]
    fn test_modified_payload_rejected() {
        let payload = br#"{"id":"evt_1","amount":100}"#;
        let tampered = br#"{"id":"evt_1","amount":999}"#;
        let now = 1_700_000_000;
        let header = header_for(payload, SECRET, now);
        assert!(verify_signature(tampered, &header, SECRET, now).is_err());
    }

    #[test]
    fn test_old_timestamp_rejected() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = 1_700_000_000;
        let stale = now - 600;
        let header = header_for(payload, SECRET, stale);
        assert!(verify_signature(payload, &header, SECRET, now).is_err());
    }

    #[test]
    fn test_timestamp_within_tolerance_accepted() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = 1_700_000_000;
        let recent = now - SIGNATURE_TOLERANCE_SECS + 1;
        let header = header_for(payload, SECRET, recent);
        assert!(verify_signature(payload, &header, SECRET, now).is_ok());
    }

    #[test]
    fn test_missing_timestamp() {
        let result = verify_signature(b"{}", "v1=deadbeef", SECRET, 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_signature() {
        let result = verify_signature(b"{}", "t=1234567890", SECRET, 1_234_567_890);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_header() {
        assert!(verify_signature(b"{}", "not a header", SECRET, 0).is_err());
        assert!(verify_signature(b"{}", "", SECRET, 0).is_err());
        assert!(verify_signature(b"{}", "t=abc,v1=def", SECRET, 0).is_err());
    }

    #[test]
    fn test_secret_rotation_second_candidate_matches() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = 1_700_000_000;
        let good = sign(payload, SECRET, now);
        let bad = sign(payload, "old_secret", now);
        let header = format!("t={now},v1={bad},v1={good}");
        assert!(verify_signature(payload, &header, SECRET, now).is_ok());
    }

    #[test]
    fn test_parse_event() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_123"}}}"#;
        let now = 1_700_000_000;
        let header = header_for(payload, SECRET, now);
        let event = parse_event(payload, &header, SECRET, now).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object["id"], "cs_123");
    }
}
