//! Order endpoint validation tests. Every case here fails before any
//! database or Stripe traffic.

#![allow(clippy::unwrap_used)]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use soundbeatx_api::app;
use soundbeatx_integration_tests::test_state;

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn error_message(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["error"].as_str().unwrap().to_string()
}

fn address() -> Value {
    json!({
        "name": "Asha Rao",
        "email": "asha@example.com",
        "phone": "9876543210",
        "address": "12 MG Road",
        "city": "Bengaluru",
        "state": "Karnataka",
        "pincode": "560001"
    })
}

fn cart() -> Value {
    json!([{
        "id": "cart-1",
        "name": "Boat Rockerz 255 Pro",
        "price": 999.0,
        "quantity": 2
    }])
}

#[tokio::test]
async fn checkout_session_requires_cart() {
    let app = app(test_state());
    let response = app
        .oneshot(post_json(
            "/api/orders/create-checkout-session",
            &json!({"cart": [], "email": "a@b.c"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Cart is required and cannot be empty"
    );
}

#[tokio::test]
async fn checkout_session_requires_email() {
    let app = app(test_state());
    let response = app
        .oneshot(post_json(
            "/api/orders/create-checkout-session",
            &json!({"cart": cart(), "shippingAddress": address()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Email is required");
}

#[tokio::test]
async fn checkout_session_rejects_forged_totals() {
    let app = app(test_state());
    // Cart totals 1998 but the client claims 1
    let response = app
        .oneshot(post_json(
            "/api/orders/create-checkout-session",
            &json!({
                "cart": cart(),
                "email": "asha@example.com",
                "shippingAddress": address(),
                "subtotal": 1.0,
                "shipping": 0.0,
                "total": 1.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Subtotal does not match cart items"
    );
}

#[tokio::test]
async fn create_order_requires_user() {
    let app = app(test_state());
    let response = app
        .oneshot(post_json(
            "/api/orders/create",
            &json!({"items": cart(), "shippingAddress": address()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "User ID is required");
}

#[tokio::test]
async fn create_order_requires_items() {
    let app = app(test_state());
    let response = app
        .oneshot(post_json(
            "/api/orders/create",
            &json!({"userId": "u1", "items": [], "shippingAddress": address()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Items are required");
}

#[tokio::test]
async fn create_order_rejects_unknown_payment_method() {
    let app = app(test_state());
    let response = app
        .oneshot(post_json(
            "/api/orders/create",
            &json!({
                "userId": "u1",
                "items": cart(),
                "shippingAddress": address(),
                "subtotal": 1998.0,
                "shipping": 0.0,
                "total": 1998.0,
                "paymentMethod": "Barter"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid payment method");
}

#[tokio::test]
async fn create_order_rejects_total_mismatch() {
    let app = app(test_state());
    let response = app
        .oneshot(post_json(
            "/api/orders/create",
            &json!({
                "userId": "u1",
                "items": cart(),
                "shippingAddress": address(),
                "subtotal": 1998.0,
                "shipping": 50.0,
                "total": 1998.0,
                "paymentMethod": "COD"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Total does not match subtotal plus shipping"
    );
}

#[tokio::test]
async fn verify_session_requires_session_id() {
    let app = app(test_state());
    let response = app
        .oneshot(post_json("/api/orders/verify-session", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Session ID is required");
}

#[tokio::test]
async fn malformed_order_id_is_rejected() {
    let app = app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/orders/not-a-hex-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid order ID format");
}

#[tokio::test]
async fn malformed_product_id_is_rejected() {
    let app = app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/products/12345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid product ID format");
}

#[tokio::test]
async fn status_update_rejects_unknown_status() {
    let app = app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/orders/64b7f3a2c9e77a0012345678/status")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"orderStatus": "Teleported"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid order status");
}
