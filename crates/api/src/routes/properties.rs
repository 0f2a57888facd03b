//! Property CRUD handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openhouse_domain::{
    NewProperty, Page, Property, PropertyFilter, PropertyStatus, PropertyUpdate,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{ApiError, AppContext};

#[derive(Deserialize)]
pub struct PropertyListParams {
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_bedrooms: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Serialize)]
pub struct PropertyListResponse {
    success: bool,
    total: u64,
    properties: Vec<Property>,
}

/// `GET /api/properties`
pub async fn list(
    State(context): State<Arc<AppContext>>,
    Query(params): Query<PropertyListParams>,
) -> Result<Json<PropertyListResponse>, ApiError> {
    let filter = PropertyFilter {
        status: params.status,
        property_type: params.property_type,
        min_price: params.min_price,
        max_price: params.max_price,
        min_bedrooms: params.min_bedrooms,
    };
    let page = Page::clamped(params.limit, params.offset);
    let (properties, total) =
        context.properties.list(&filter, page).await.map_err(|err| context.fail(err))?;

    Ok(Json(PropertyListResponse { success: true, total, properties }))
}

/// `POST /api/properties`
pub async fn create(
    State(context): State<Arc<AppContext>>,
    Json(fields): Json<NewProperty>,
) -> Result<Response, ApiError> {
    let property = context.properties.create(fields).await.map_err(|err| context.fail(err))?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "property": property })))
        .into_response())
}

/// `GET /api/properties/{id}`
pub async fn fetch(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let property = context.properties.get(&id).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "property": property })))
}

/// `PATCH /api/properties/{id}`
pub async fn update(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(update): Json<PropertyUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let property =
        context.properties.update(&id, update).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "property": property })))
}

/// `DELETE /api/properties/{id}`
pub async fn remove(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    context.properties.delete(&id).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "message": "property deleted" })))
}
