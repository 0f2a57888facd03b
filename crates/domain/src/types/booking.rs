//! Booking flow types
//!
//! `Slot` values are ephemeral: produced during one booking attempt and
//! discarded. Only the chosen slot survives, as the meeting's date and time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{OpenHouseError, Result};
use crate::types::agent::AgentContact;
use crate::types::lead::{Lead, NewLead};
use crate::types::meeting::Meeting;
use crate::types::property::PropertySummary;
use crate::utils::contact::is_valid_email;

/// A candidate viewing window on one agent's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub agent_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Outcome tier of a booking attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Lead persisted, no meeting could be scheduled.
    LeadOnly,
    /// Lead and meeting persisted, calendar event reserved best-effort.
    FullyBooked,
}

/// Inbound booking request: lead fields plus the property to view and an
/// optional preferred time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub property_type_preference: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub property_id: String,
    #[serde(default)]
    pub preferred_time: Option<DateTime<Utc>>,
    /// IANA timezone used when formatting the confirmation for the lead.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl BookingRequest {
    /// Field presence and shape checks; performed before any write.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("name is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("email is required".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(OpenHouseError::InvalidInput(format!("invalid email: {}", self.email)));
        }
        if self.property_id.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("property_id is required".into()));
        }
        Ok(())
    }

    /// The lead-creation fields carried by this request.
    pub fn lead_fields(&self) -> NewLead {
        NewLead {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            source: self.source.clone().or_else(|| Some("booking".into())),
            budget: self.budget,
            property_type_preference: self.property_type_preference.clone(),
            timeline: self.timeline.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Result of a booking attempt, as returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_status: BookingStatus,
    pub lead: Lead,
    pub property: PropertySummary,
    pub meeting: Option<Meeting>,
    pub agent: Option<AgentContact>,
    pub calendar_link: Option<String>,
}

/// One free window offered by the availability query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub agent: AgentContact,
}
