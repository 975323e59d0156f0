//! 产品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use tracing::{debug, info};
use validator::Validate;

use super::model::{DeleteResponse, Product, ProductPayload, SearchQuery};
use crate::app::AppState;
use crate::core::error::CoreError;

/// 路径中的产品 id 必须是正整数
fn product_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, CoreError> {
    let Path(id) = path?;
    if id < 1 {
        return Err(CoreError::BadRequest(format!(
            "Invalid product ID: {} is not a positive integer",
            id
        )));
    }
    Ok(id)
}

fn product_payload(
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<ProductPayload, CoreError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(payload)
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let payload = product_payload(payload)?;
    let product = state.product_service.create_product(payload).await?;

    info!("Created product: {} ({})", product.name, product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>, CoreError> {
    let id = product_id(id)?;
    let product = state
        .product_service
        .get_product(id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let id = product_id(id)?;
    let payload = product_payload(payload)?;

    let rows = state.product_service.update_product(id, &payload).await?;
    if rows == 0 {
        debug!("Update matched no rows for product {}", id);
    }

    Ok(Json(payload.into_product(id)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, CoreError> {
    let id = product_id(id)?;

    let rows = state.product_service.delete_product(id).await?;
    info!("Deleted product {} ({} rows)", id, rows);

    Ok(Json(DeleteResponse::success()))
}

pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let Query(query) = query?;
    let name = query
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CoreError::BadRequest("Search term 'name' must not be empty".to_string()))?;

    let products = state.product_service.search_products(&name).await?;
    Ok(Json(products))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

pub async fn count_products(State(state): State<AppState>) -> Result<Json<i64>, CoreError> {
    let count = state.product_service.count_products().await?;
    Ok(Json(count))
}
