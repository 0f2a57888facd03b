//! Agent CRUD handlers and calendar passthrough.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openhouse_domain::{Agent, AgentUpdate, NewAgent, Page};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{ApiError, AppContext};

#[derive(Deserialize)]
pub struct AgentListParams {
    #[serde(default)]
    pub only_active: Option<bool>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Serialize)]
struct AgentView {
    #[serde(flatten)]
    agent: Agent,
    success_rate: f64,
    bookable: bool,
}

impl From<Agent> for AgentView {
    fn from(agent: Agent) -> Self {
        let success_rate = agent.success_rate();
        let bookable = agent.is_bookable();
        Self { agent, success_rate, bookable }
    }
}

/// `GET /api/agents`
pub async fn list(
    State(context): State<Arc<AppContext>>,
    Query(params): Query<AgentListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = Page::clamped(params.limit, params.offset);
    let agents = context
        .agents
        .list(params.only_active.unwrap_or(false), page)
        .await
        .map_err(|err| context.fail(err))?;
    let agents: Vec<AgentView> = agents.into_iter().map(AgentView::from).collect();

    Ok(Json(json!({ "success": true, "agents": agents })))
}

/// `POST /api/agents`
pub async fn create(
    State(context): State<Arc<AppContext>>,
    Json(fields): Json<NewAgent>,
) -> Result<Response, ApiError> {
    let agent = context.agents.create(fields).await.map_err(|err| context.fail(err))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "agent": AgentView::from(agent) })),
    )
        .into_response())
}

/// `GET /api/agents/{id}`
pub async fn fetch(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let agent = context.agents.get(&id).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "agent": AgentView::from(agent) })))
}

/// `PATCH /api/agents/{id}`
pub async fn update(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(update): Json<AgentUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let agent = context.agents.update(&id, update).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "agent": AgentView::from(agent) })))
}

#[derive(Deserialize)]
pub struct UpcomingParams {
    #[serde(default)]
    pub max: Option<usize>,
}

/// `GET /api/agents/{id}/events` - upcoming calendar events, straight from
/// the provider. Provider failures surface as 503 here.
pub async fn upcoming_events(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let events = context
        .agents
        .upcoming_events(&id, params.max.unwrap_or(10))
        .await
        .map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "events": events })))
}
