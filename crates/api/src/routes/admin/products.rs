//! Admin product management routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use soundbeatx_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{CreateProduct, Pagination, ProductDto, UpdateProduct};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats/overview", get(stats))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

fn parse_product_id(id: &str) -> Result<ProductId> {
    id.parse::<ProductId>()
        .map_err(|_| ApiError::BadRequest("Invalid product ID format".to_string()))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    all: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let repo = ProductRepository::new(state.pool());

    // ?all=true skips pagination so the admin panel can populate dropdowns
    if query.all.as_deref() == Some("true") {
        let products = repo.list_all().await?;
        let total = i64::try_from(products.len()).unwrap_or(i64::MAX);
        let products: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
        return Ok(Json(json!({
            "products": products,
            "pagination": Pagination {
                page: 1,
                limit: total,
                total,
                total_pages: 1,
            },
        })));
    }

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let (products, total) = repo.list_paginated(page, limit).await?;
    let products: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();

    Ok(Json(json!({
        "products": products,
        "pagination": Pagination::new(page, limit, total),
    })))
}

async fn get_one(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>> {
    let id = parse_product_id(&id)?;
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    Ok(Json(product.into()))
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    price: Option<Decimal>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Value>)> {
    let (Some(name), Some(price)) = (payload.name, payload.price) else {
        return Err(ApiError::BadRequest(
            "Name and price are required".to_string(),
        ));
    };

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .create(&CreateProduct {
            name,
            description: payload.description,
            price,
            category: payload.category,
            image: payload.image,
        })
        .await?;

    tracing::info!(product_id = %product.id, admin = %admin.email, "product created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "product": ProductDto::from(product),
        })),
    ))
}

async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<ProductDto>> {
    if payload.name.is_none() || payload.price.is_none() {
        return Err(ApiError::BadRequest(
            "Name and price are required".to_string(),
        ));
    }
    let id = parse_product_id(&id)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .update(
            &id,
            &UpdateProduct {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                category: payload.category,
                image: payload.image,
            },
        )
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("Product not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(product.into()))
}

async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_product_id(&id)?;
    let repo = ProductRepository::new(state.pool());
    if !repo.delete(&id).await? {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    tracing::info!(product_id = %id, admin = %admin.email, "product deleted");

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let repo = ProductRepository::new(state.pool());
    let total = repo.count().await?;
    Ok(Json(json!({ "totalProducts": total })))
}
