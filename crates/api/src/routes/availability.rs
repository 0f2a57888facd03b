//! The public availability query.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use openhouse_domain::AvailabilitySlot;
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppContext};

#[derive(Deserialize)]
pub struct AvailabilityParams {
    pub property_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    success: bool,
    date: NaiveDate,
    slots: Vec<AvailabilitySlot>,
}

/// `GET /api/availability?property_id=..&date=2030-06-03&timezone=..`
///
/// Free slots of every bookable agent for the requested day, merged and
/// sorted by start time ascending.
pub async fn query(
    State(context): State<Arc<AppContext>>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let slots = context
        .booking
        .availability_for(&params.property_id, params.date, params.timezone.as_deref())
        .await
        .map_err(|err| context.fail(err))?;

    Ok(Json(AvailabilityResponse { success: true, date: params.date, slots }))
}
