//! Public product catalog routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use soundbeatx_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::models::{CreateProduct, ProductDto, UpdateProduct};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

/// Parse a path id, rejecting anything that is not 24 hex characters.
fn parse_product_id(id: &str) -> Result<ProductId> {
    id.parse::<ProductId>()
        .map_err(|_| ApiError::BadRequest("Invalid product ID format".to_string()))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductDto>>> {
    let repo = ProductRepository::new(state.pool());
    let products = repo.list_all().await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

async fn get_one(
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
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<ProductDto>)> {
    let (Some(name), Some(price), Some(category)) =
        (payload.name, payload.price, payload.category.clone())
    else {
        return Err(ApiError::BadRequest(
            "Missing required fields: name, price, and category are required".to_string(),
        ));
    };

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .create(&CreateProduct {
            name,
            description: payload.description,
            price,
            category: Some(category),
            image: payload.image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<ProductDto>> {
    let id = parse_product_id(&id)?;
    let repo = ProductRepository::new(state.pool());
    let product = repo.update(&id, &payload).await.map_err(|err| match err {
        crate::db::RepositoryError::NotFound => {
            ApiError::NotFound("Product not found".to_string())
        }
        other => other.into(),
    })?;
    Ok(Json(product.into()))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_product_id(&id)?;
    let repo = ProductRepository::new(state.pool());
    if !repo.delete(&id).await? {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
