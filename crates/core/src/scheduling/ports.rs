//! Calendar provider port interface
//!
//! The boundary between the booking engine and whichever external calendar
//! system an agent is linked to. Credential handling and OAuth mechanics are
//! the provider's internal concern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openhouse_domain::Result;
use serde::{Deserialize, Serialize};

/// Details for creating an external calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendee_emails: Vec<String>,
}

/// Reference to a created external calendar event.
#[derive(Debug, Clone)]
pub struct EventRef {
    pub event_id: String,
    pub link: Option<String>,
}

/// Upcoming calendar event summary (agent schedule passthrough).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Trait for calendar provider operations
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Whether the given window is free of busy events on the calendar.
    async fn is_slot_free(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool>;

    /// Create an event for the given window.
    async fn reserve_event(&self, calendar_id: &str, event: &EventRequest) -> Result<EventRef>;

    /// The next `max` upcoming events, soonest first.
    async fn list_upcoming(&self, calendar_id: &str, max: usize) -> Result<Vec<UpcomingEvent>>;
}
