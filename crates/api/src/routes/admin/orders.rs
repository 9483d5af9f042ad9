//! Admin order management routes.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::get, routing::patch};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use soundbeatx_core::{OrderId, OrderStatus, PaymentStatus};

use crate::db::OrderRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{OrderDto, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/stats/overview", get(stats))
        .route("/{id}", get(get_one).delete(delete))
        .route("/{id}/status", patch(update_status))
}

fn parse_order_id(id: &str) -> Result<OrderId> {
    id.parse::<OrderId>()
        .map_err(|_| ApiError::BadRequest("Invalid order ID format".to_string()))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<i64>,
    limit: Option<i64>,
    status: Option<String>,
}

async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid order status".to_string()))?;

    let repo = OrderRepository::new(state.pool());
    let (orders, total) = repo.list(status, page, limit).await?;
    let orders: Vec<OrderDto> = orders.into_iter().map(OrderDto::from).collect();

    Ok(Json(json!({
        "orders": orders,
        "pagination": Pagination::new(page, limit, total),
    })))
}

async fn get_one(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderDto>> {
    let id = parse_order_id(&id)?;
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;
    Ok(Json(order.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusRequest {
    #[serde(default)]
    order_status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
}

async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<OrderDto>> {
    let id = parse_order_id(&id)?;
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

    tracing::info!(order_id = %order.id, admin = %admin.email, "order status updated");

    Ok(Json(order.into()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderStatsDto {
    total_orders: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    total_revenue: Decimal,
    status_counts: BTreeMap<String, i64>,
}

async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<OrderStatsDto>> {
    let repo = OrderRepository::new(state.pool());
    let stats = repo.stats().await?;
    Ok(Json(OrderStatsDto {
        total_orders: stats.total_orders,
        total_revenue: stats.total_revenue,
        status_counts: stats.status_counts,
    }))
}

async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_order_id(&id)?;
    let repo = OrderRepository::new(state.pool());
    if !repo.delete(&id).await? {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    tracing::info!(order_id = %id, admin = %admin.email, "order deleted");

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}
