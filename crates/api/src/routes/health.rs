//! Liveness/readiness probe.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::{ApiError, AppContext};

/// `GET /health` - verifies database connectivity.
pub async fn check(State(context): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    context.db.health_check().map_err(|err| context.fail(err))?;
    Ok(Json(json!({ "status": "ok" })))
}
