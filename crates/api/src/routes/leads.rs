//! Lead CRUD handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openhouse_domain::{
    Lead, LeadFilter, LeadStats, LeadStatus, LeadUpdate, NewLead, Page, SortKey, SortOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{ApiError, AppContext};

#[derive(Deserialize)]
pub struct LeadListParams {
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub assigned_agent: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Serialize)]
pub struct LeadListResponse {
    success: bool,
    total: u64,
    leads: Vec<Lead>,
}

/// `GET /api/leads`
pub async fn list(
    State(context): State<Arc<AppContext>>,
    Query(params): Query<LeadListParams>,
) -> Result<Json<LeadListResponse>, ApiError> {
    let filter = LeadFilter {
        status: params.status,
        assigned_agent: params.assigned_agent,
        search: params.search,
    };
    let page = Page::clamped(params.limit, params.offset);
    let (leads, total) = context
        .leads
        .list(&filter, params.sort.unwrap_or_default(), params.order.unwrap_or_default(), page)
        .await
        .map_err(|err| context.fail(err))?;

    Ok(Json(LeadListResponse { success: true, total, leads }))
}

/// `POST /api/leads`
pub async fn create(
    State(context): State<Arc<AppContext>>,
    Json(fields): Json<NewLead>,
) -> Result<Response, ApiError> {
    let lead = context.leads.create(fields).await.map_err(|err| context.fail(err))?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "lead": lead }))).into_response())
}

/// `GET /api/leads/stats`
pub async fn stats(
    State(context): State<Arc<AppContext>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats: LeadStats = context.leads.stats().await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}

/// `GET /api/leads/{id}`
pub async fn fetch(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let lead = context.leads.get(&id).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "lead": lead })))
}

/// `PATCH /api/leads/{id}`
pub async fn update(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(update): Json<LeadUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let lead = context.leads.update(&id, update).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "lead": lead })))
}

/// `DELETE /api/leads/{id}`
pub async fn remove(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    context.leads.delete(&id).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "message": "lead deleted" })))
}
