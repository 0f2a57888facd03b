//! Public webhook ingestion.
//!
//! Unlike the booking entry point, a resubmitted email here merges into the
//! existing lead instead of conflicting: form providers retry freely, and a
//! webhook must be idempotent.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openhouse_domain::NewLead;
use serde_json::json;

use crate::{ApiError, AppContext};

/// `POST /api/webhooks/leads`
pub async fn ingest_lead(
    State(context): State<Arc<AppContext>>,
    Json(fields): Json<NewLead>,
) -> Result<Response, ApiError> {
    let (lead, created) =
        context.leads.ingest(fields).await.map_err(|err| context.fail(err))?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    let message = if created { "lead created" } else { "existing lead updated" };
    Ok((
        status,
        Json(json!({ "success": true, "message": message, "created": created, "lead": lead })),
    )
        .into_response())
}
