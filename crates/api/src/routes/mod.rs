//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                              - Liveness check
//! GET   /health/ready                        - Readiness check (DB ping)
//!
//! # Products (public)
//! GET    /api/products                       - Catalog listing
//! GET    /api/products/{id}                  - Product detail
//! POST   /api/products                       - Create product
//! PUT    /api/products/{id}                  - Update product
//! DELETE /api/products/{id}                  - Delete product
//!
//! # Orders (public)
//! POST  /api/orders/create-checkout-session  - Start a Stripe hosted checkout
//! POST  /api/orders/create-payment-intent    - Create a card-element payment intent
//! POST  /api/orders/create                   - Create an order (COD or prepaid)
//! GET   /api/orders/user/{user_id}           - Orders for a buyer
//! GET   /api/orders/{order_id}               - Order detail
//! PATCH /api/orders/{order_id}/status        - Update order/payment status
//! POST  /api/orders/verify-session           - Reconcile after checkout redirect
//! POST  /api/orders/webhook                  - Stripe webhook (signed)
//!
//! # Admin auth
//! POST  /api/admin/auth/login                - Email/password login, returns token
//! POST  /api/admin/auth/register             - Create an admin account
//! GET   /api/admin/auth/profile              - Current admin (requires token)
//!
//! # Admin orders (all require token)
//! GET    /api/admin/orders                   - Paginated listing, ?status= filter
//! GET    /api/admin/orders/{id}              - Order detail
//! PATCH  /api/admin/orders/{id}/status       - Update statuses
//! DELETE /api/admin/orders/{id}              - Delete order
//! GET    /api/admin/orders/stats/overview    - Dashboard aggregates
//!
//! # Admin products (all require token)
//! GET    /api/admin/products                 - Paginated listing, ?all=true for everything
//! GET    /api/admin/products/{id}            - Product detail
//! POST   /api/admin/products                 - Create product
//! PUT    /api/admin/products/{id}            - Update product
//! DELETE /api/admin/products/{id}            - Delete product
//! GET    /api/admin/products/stats/overview  - Catalog count
//! ```

pub mod admin;
pub mod orders;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Assemble all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", products::router())
        .nest("/api/orders", orders::router())
        .nest("/api/admin/auth", admin::auth::router())
        .nest("/api/admin/orders", admin::orders::router())
        .nest("/api/admin/products", admin::products::router())
}
