//! Meeting types
//!
//! `lead_name`, `property_address` and `assigned_to` are denormalized
//! snapshots, not references: a meeting record must read the same years later
//! even if the lead is renamed or the agent reassigned.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_MEETING_DURATION_MIN;
use crate::errors::{OpenHouseError, Result};

/// Meeting lifecycle status. Transitions happen only via explicit status
/// updates, never by the passage of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Missed,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Missed => "missed",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "missed" => Ok(Self::Missed),
            other => Err(OpenHouseError::InvalidInput(format!("unknown meeting status: {other}"))),
        }
    }
}

/// Meeting record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    /// Snapshot of the lead's name at booking time.
    pub lead_name: String,
    /// Snapshot of the property address at booking time.
    pub property_address: String,
    pub date_time: DateTime<Utc>,
    pub duration_min: i64,
    pub status: MeetingStatus,
    /// Snapshot of the assigned agent's display name.
    pub assigned_to: String,
    pub notes: Option<String>,
    /// External calendar event id, when reservation succeeded.
    pub calendar_event_id: Option<String>,
    pub calendar_event_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    pub fn create(fields: NewMeeting) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            lead_name: fields.lead_name,
            property_address: fields.property_address,
            date_time: fields.date_time,
            duration_min: fields.duration_min.unwrap_or(DEFAULT_MEETING_DURATION_MIN),
            status: MeetingStatus::Scheduled,
            assigned_to: fields.assigned_to,
            notes: fields.notes,
            calendar_event_id: None,
            calendar_event_link: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.date_time + Duration::minutes(self.duration_min)
    }

    /// True when `[date_time, end_time)` intersects the given window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.date_time < end && self.end_time() > start
    }
}

/// Fields accepted when scheduling a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeeting {
    pub lead_name: String,
    pub property_address: String,
    pub date_time: DateTime<Utc>,
    #[serde(default)]
    pub duration_min: Option<i64>,
    pub assigned_to: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for a meeting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingUpdate {
    #[serde(default)]
    pub status: Option<MeetingStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// List filter for meetings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingFilter {
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status: Option<MeetingStatus>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}
