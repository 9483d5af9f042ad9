//! Public order and checkout routes.
//!
//! Online payments reach this module from three directions: the frontend
//! starting a checkout session, Stripe's webhook announcing completion,
//! and the browser verifying the session after the success redirect. The
//! webhook and the verify call race; both reconcile through the same
//! idempotent path.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::{Json, Router, routing::get, routing::patch, routing::post};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};

use soundbeatx_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus};

use crate::db::OrderRepository;
use crate::error::{ApiError, Result};
use crate::models::{OrderDraft, OrderDto, OrderItem, ShippingAddress};
use crate::services::checkout;
use crate::state::AppState;
use crate::stripe::{self, CheckoutMetadata, CheckoutSession, StripeError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/create", post(create_order))
        .route("/verify-session", post(verify_session))
        .route("/webhook", post(webhook))
        .route("/user/{user_id}", get(list_for_user))
        .route("/{order_id}", get(get_one))
        .route("/{order_id}/status", patch(update_status))
}

fn parse_order_id(id: &str) -> Result<OrderId> {
    id.parse::<OrderId>()
        .map_err(|_| ApiError::BadRequest("Invalid order ID format".to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutSessionRequest {
    #[serde(default)]
    cart: Vec<OrderItem>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    subtotal: Decimal,
    #[serde(default)]
    shipping: Decimal,
    #[serde(default)]
    total: Decimal,
}

async fn create_checkout_session(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutSessionRequest>,
) -> Result<Json<Value>> {
    if payload.cart.is_empty() {
        return Err(ApiError::BadRequest(
            "Cart is required and cannot be empty".to_string(),
        ));
    }
    let email = payload
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required".to_string()))?;
    let shipping_address = payload
        .shipping_address
        .ok_or_else(|| ApiError::BadRequest("Shipping address is required".to_string()))?;

    checkout::validate_totals(
        &payload.cart,
        payload.subtotal,
        payload.shipping,
        payload.total,
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let metadata = CheckoutMetadata {
        user_id: payload.user_id.unwrap_or_else(|| "guest".to_string()),
        cart: payload.cart,
        shipping_address,
        subtotal: payload.subtotal,
        shipping: payload.shipping,
        total: payload.total,
    };

    let session = state
        .stripe()
        .create_checkout_session(&email, &metadata)
        .await?;

    tracing::info!(session_id = %session.id, "checkout session created");

    Ok(Json(json!({
        "sessionId": session.id,
        "url": session.url,
    })))
}

#[derive(Debug, Deserialize)]
struct PaymentIntentRequest {
    amount: Decimal,
}

async fn create_payment_intent(
    State(state): State<AppState>,
    Json(payload): Json<PaymentIntentRequest>,
) -> Result<Json<Value>> {
    if payload.amount <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Amount must be greater than zero".to_string(),
        ));
    }

    let intent = state.stripe().create_payment_intent(payload.amount).await?;

    Ok(Json(json!({
        "clientSecret": intent.client_secret,
        "paymentIntentId": intent.id,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    items: Vec<OrderItem>,
    #[serde(default)]
    shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    subtotal: Decimal,
    #[serde(default)]
    shipping: Decimal,
    #[serde(default)]
    total: Decimal,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    stripe_payment_intent_id: Option<String>,
}

async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Value>> {
    let user_id = payload
        .user_id
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))?;
    if payload.items.is_empty() {
        return Err(ApiError::BadRequest("Items are required".to_string()));
    }
    let shipping_address = payload
        .shipping_address
        .ok_or_else(|| ApiError::BadRequest("Shipping address is required".to_string()))?;
    let payment_method = payload
        .payment_method
        .as_deref()
        .unwrap_or("")
        .parse::<PaymentMethod>()
        .map_err(|_| ApiError::BadRequest("Invalid payment method".to_string()))?;

    checkout::validate_totals(
        &payload.items,
        payload.subtotal,
        payload.shipping,
        payload.total,
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let payment_status = checkout::initial_payment_status(payment_method);

    let draft = OrderDraft {
        user_id,
        items: payload.items,
        shipping_address,
        subtotal: payload.subtotal,
        shipping: payload.shipping,
        total: payload.total,
        payment_method,
        payment_status,
        stripe_payment_intent_id: payload.stripe_payment_intent_id,
        stripe_session_id: None,
    };

    let repo = OrderRepository::new(state.pool());
    let order = if draft.stripe_payment_intent_id.is_some() {
        // Keyed insert: a duplicate submission for the same payment returns
        // the already-created order instead of a second one
        let (order, created) = repo.create_idempotent(&draft).await?;
        if !created {
            tracing::info!(order_id = %order.id, "duplicate order submission, returning existing");
        }
        order
    } else {
        repo.create(&draft).await?
    };

    Ok(Json(json!({
        "success": true,
        "order": OrderDto::from(order),
    })))
}

async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_by_user(&user_id).await?;
    let orders: Vec<OrderDto> = orders.into_iter().map(OrderDto::from).collect();
    Ok(Json(json!({ "orders": orders })))
}

async fn get_one(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_order_id(&order_id)?;
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;
    Ok(Json(json!({ "order": OrderDto::from(order) })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusRequest {
    #[serde(default)]
    order_status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
}

fn parse_status_update(
    payload: &UpdateStatusRequest,
) -> Result<(Option<OrderStatus>, Option<PaymentStatus>)> {
    let order_status = payload
        .order_status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid order status".to_string()))?;
    let payment_status = payload
        .payment_status
        .as_deref()
        .map(str::parse::<PaymentStatus>)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid payment status".to_string()))?;
    Ok((order_status, payment_status))
}

async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Value>> {
    let id = parse_order_id(&order_id)?;
    let (order_status, payment_status) = parse_status_update(&payload)?;

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .update_status(&id, order_status, payment_status)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("Order not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(json!({
        "success": true,
        "order": OrderDto::from(order),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifySessionRequest {
    #[serde(default)]
    session_id: Option<String>,
}

/// Reconcile an order after the browser lands on the success page.
///
/// Retrieves the session from Stripe rather than trusting the client, so a
/// forged session id cannot mint a paid order.
async fn verify_session(
    State(state): State<AppState>,
    Json(payload): Json<VerifySessionRequest>,
) -> Result<Json<Value>> {
    let session_id = payload
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Session ID is required".to_string()))?;

    let session = state.stripe().retrieve_checkout_session(&session_id).await?;
    let repo = OrderRepository::new(state.pool());
    let (order, _created) = checkout::find_or_create_order(&repo, &session).await?;

    Ok(Json(json!({ "order": OrderDto::from(order) })))
}

/// Stripe webhook endpoint.
///
/// Signature is verified against the raw body before any parsing. Failures
/// after verification return an error status so Stripe redelivers.
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing Stripe-Signature header".to_string()))?;

    let event = stripe::webhook::parse_event(
        &body,
        signature,
        state.config().stripe.webhook_secret.expose_secret(),
        chrono::Utc::now().timestamp(),
    )?;

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: CheckoutSession = serde_json::from_value(event.data.object)
                .map_err(|e| StripeError::Parse(e.to_string()))?;
            if session.is_paid() {
                let repo = OrderRepository::new(state.pool());
                checkout::find_or_create_order(&repo, &session).await?;
            } else {
                tracing::info!(session_id = %session.id, "completed session not paid, skipping");
            }
        }
        "payment_intent.payment_failed" => {
            if let Some(intent_id) = event.data.object.get("id").and_then(Value::as_str) {
                tracing::warn!(intent_id, "payment failed");
                let repo = OrderRepository::new(state.pool());
                if let Some(order) = repo.find_by_payment_intent(intent_id).await? {
                    repo.update_status(&order.id, None, Some(PaymentStatus::Failed))
                        .await?;
                }
            }
        }
        other => {
            tracing::debug!(event_type = other, "unhandled webhook event");
        }
    }

    Ok(Json(json!({ "received": true })))
}
