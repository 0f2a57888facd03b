//! Meeting handlers: manual scheduling and status transitions.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use openhouse_core::ScheduleOutcome;
use openhouse_domain::{
    Meeting, MeetingFilter, MeetingStatus, MeetingUpdate, NewMeeting, Page,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{ApiError, AppContext};

#[derive(Deserialize)]
pub struct MeetingListParams {
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status: Option<MeetingStatus>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Serialize)]
pub struct MeetingListResponse {
    success: bool,
    meetings: Vec<Meeting>,
}

/// `GET /api/meetings`
pub async fn list(
    State(context): State<Arc<AppContext>>,
    Query(params): Query<MeetingListParams>,
) -> Result<Json<MeetingListResponse>, ApiError> {
    let filter = MeetingFilter {
        assigned_to: params.assigned_to,
        status: params.status,
        from: params.from,
        to: params.to,
    };
    let page = Page::clamped(params.limit, params.offset);
    let meetings =
        context.meetings.list(&filter, page).await.map_err(|err| context.fail(err))?;

    Ok(Json(MeetingListResponse { success: true, meetings }))
}

/// `POST /api/meetings`
///
/// Manual scheduling. A window collision is a 409 carrying the conflicting
/// meetings.
pub async fn create(
    State(context): State<Arc<AppContext>>,
    Json(fields): Json<NewMeeting>,
) -> Result<Response, ApiError> {
    match context.meetings.schedule(fields).await.map_err(|err| context.fail(err))? {
        ScheduleOutcome::Scheduled(meeting) => Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true, "meeting": meeting })),
        )
            .into_response()),
        ScheduleOutcome::Conflicts(conflicts) => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "message": "the requested time overlaps existing meetings",
                "conflicts": conflicts,
            })),
        )
            .into_response()),
    }
}

/// `GET /api/meetings/{id}`
pub async fn fetch(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let meeting = context.meetings.get(&id).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "meeting": meeting })))
}

/// `PATCH /api/meetings/{id}`
pub async fn update(
    State(context): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(update): Json<MeetingUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let meeting =
        context.meetings.update(&id, update).await.map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "success": true, "meeting": meeting })))
}
