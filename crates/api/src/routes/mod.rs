//! Route table and handlers, one module per surface.

pub mod agents;
pub mod availability;
pub mod bookings;
pub mod health;
pub mod leads;
pub mod meetings;
pub mod properties;
pub mod webhooks;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::AppContext;

pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::check))
        .route("/api/bookings", post(bookings::create))
        .route("/api/availability", get(availability::query))
        .route("/api/webhooks/leads", post(webhooks::ingest_lead))
        .route("/api/leads", get(leads::list).post(leads::create))
        .route("/api/leads/stats", get(leads::stats))
        .route(
            "/api/leads/{id}",
            get(leads::fetch).patch(leads::update).delete(leads::remove),
        )
        .route("/api/properties", get(properties::list).post(properties::create))
        .route(
            "/api/properties/{id}",
            get(properties::fetch).patch(properties::update).delete(properties::remove),
        )
        .route("/api/meetings", get(meetings::list).post(meetings::create))
        .route("/api/meetings/{id}", get(meetings::fetch).patch(meetings::update))
        .route("/api/agents", get(agents::list).post(agents::create))
        .route("/api/agents/{id}", get(agents::fetch).patch(agents::update))
        .route("/api/agents/{id}/events", get(agents::upcoming_events))
        .with_state(context)
}
