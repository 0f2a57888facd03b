//! The public booking entry point.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openhouse_domain::{
    AgentContact, BookingConfirmation, BookingRequest, BookingStatus, Lead, Meeting,
    OpenHouseError, PropertySummary,
};
use serde::Serialize;
use serde_json::json;

use crate::{ApiError, AppContext};

#[derive(Serialize)]
struct BookingResponse {
    success: bool,
    booking_status: BookingStatus,
    message: String,
    lead: Lead,
    property: PropertySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    meeting: Option<Meeting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agent: Option<AgentContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calendar_link: Option<String>,
}

/// `POST /api/bookings`
///
/// 201 lead + meeting booked, 200 lead stored without a meeting, 409 on a
/// duplicate lead (with the existing lead's summary), 400/404 before any
/// write.
pub async fn create(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<BookingRequest>,
) -> Result<Response, ApiError> {
    let email = request.email.clone();

    match context.booking.book(request).await {
        Ok(confirmation) => Ok(respond(confirmation)),
        Err(OpenHouseError::Conflict(message)) => {
            // Attach a summary of the lead the caller collided with.
            let existing = context.leads.find_by_email(&email).await.ok().flatten();
            let body = json!({
                "success": false,
                "message": message,
                "existing_lead": existing.map(|lead| json!({
                    "id": lead.id,
                    "name": lead.name,
                    "email": lead.email,
                    "status": lead.status,
                    "assigned_agent": lead.assigned_agent,
                })),
            });
            Ok((StatusCode::CONFLICT, Json(body)).into_response())
        }
        Err(err) => Err(context.fail(err)),
    }
}

fn respond(confirmation: BookingConfirmation) -> Response {
    let (status, message) = match confirmation.booking_status {
        BookingStatus::FullyBooked => {
            (StatusCode::CREATED, "Viewing booked and confirmed".to_string())
        }
        BookingStatus::LeadOnly => (
            StatusCode::OK,
            "Inquiry received; an agent will reach out to schedule a viewing".to_string(),
        ),
    };

    let body = BookingResponse {
        success: true,
        booking_status: confirmation.booking_status,
        message,
        lead: confirmation.lead,
        property: confirmation.property,
        meeting: confirmation.meeting,
        agent: confirmation.agent,
        calendar_link: confirmation.calendar_link,
    };
    (status, Json(body)).into_response()
}
