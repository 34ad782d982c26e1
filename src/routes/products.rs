use axum::{
    Json,
    extract::{Path, Query, State, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
};

use crate::{
    AppState,
    error::Result,
    models::{DeleteAck, Product, ProductFields, ProductQuery, SortField, UpdateAck},
};

pub async fn list_products(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    // an unparseable query string means no sort, not a failure
    let sort = query
        .map(|Query(params)| SortField::from(params))
        .unwrap_or_default();

    let products = state.products.list(sort).await?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(fields) = payload?;
    let product = state.products.create(fields).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProductFields>, JsonRejection>,
) -> Result<(StatusCode, Json<UpdateAck>)> {
    let Json(fields) = payload?;
    let ack = state.products.update(&id, fields).await?;

    Ok((StatusCode::NO_CONTENT, Json(ack)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteAck>)> {
    let ack = state.products.delete(&id).await?;

    Ok((StatusCode::NO_CONTENT, Json(ack)))
}
