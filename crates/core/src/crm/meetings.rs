//! Meeting service - manual scheduling and status transitions
//!
//! Manual scheduling runs the same no-double-booking rule the automated flow
//! relies on: no two Scheduled meetings for the same assignee may overlap.
//! The check fetches everything within an hour either side of the requested
//! slot and tests the fixed one-hour window against each.

use std::sync::Arc;

use chrono::{Duration, Utc};
use openhouse_domain::constants::MANUAL_OVERLAP_WINDOW_MIN;
use openhouse_domain::{
    Meeting, MeetingFilter, MeetingStatus, MeetingUpdate, NewMeeting, OpenHouseError, Page,
    Result,
};
use tracing::{info, warn};

use crate::booking::ports::{AgentRepository, MeetingRepository};

/// Outcome of a manual scheduling attempt.
#[derive(Debug, Clone)]
pub enum ScheduleOutcome {
    Scheduled(Meeting),
    /// The requested window collides with these already-scheduled meetings.
    Conflicts(Vec<Meeting>),
}

/// Meeting CRUD and scheduling service
pub struct MeetingService {
    meetings: Arc<dyn MeetingRepository>,
    agents: Arc<dyn AgentRepository>,
}

impl MeetingService {
    pub fn new(meetings: Arc<dyn MeetingRepository>, agents: Arc<dyn AgentRepository>) -> Self {
        Self { meetings, agents }
    }

    /// Schedule a meeting directly (outside the automated booking flow).
    pub async fn schedule(&self, fields: NewMeeting) -> Result<ScheduleOutcome> {
        if fields.lead_name.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("lead_name is required".into()));
        }
        if fields.property_address.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("property_address is required".into()));
        }
        if fields.assigned_to.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("assigned_to is required".into()));
        }
        if fields.date_time <= Utc::now() {
            return Err(OpenHouseError::InvalidInput(
                "meeting time must be in the future".into(),
            ));
        }

        let window = Duration::minutes(MANUAL_OVERLAP_WINDOW_MIN);
        let start = fields.date_time;
        let end = start + window;
        let nearby = self
            .meetings
            .scheduled_for_assignee(&fields.assigned_to, start - window, end)
            .await?;
        let conflicts: Vec<Meeting> =
            nearby.into_iter().filter(|meeting| meeting.overlaps(start, end)).collect();
        if !conflicts.is_empty() {
            return Ok(ScheduleOutcome::Conflicts(conflicts));
        }

        let meeting = Meeting::create(fields);
        self.meetings.insert(&meeting).await?;
        info!(meeting = %meeting.id, assigned_to = %meeting.assigned_to, "meeting scheduled");
        Ok(ScheduleOutcome::Scheduled(meeting))
    }

    pub async fn get(&self, id: &str) -> Result<Meeting> {
        self.meetings
            .find_by_id(id)
            .await?
            .ok_or_else(|| OpenHouseError::NotFound(format!("meeting {id} not found")))
    }

    pub async fn list(&self, filter: &MeetingFilter, page: Page) -> Result<Vec<Meeting>> {
        self.meetings.list(filter, page).await
    }

    /// Apply a partial update. Transitioning into Completed bumps the
    /// assigned agent's completed-meetings counter; an assignee without an
    /// agent record (manually entered name) is logged, not an error.
    pub async fn update(&self, id: &str, update: MeetingUpdate) -> Result<Meeting> {
        let mut meeting = self.get(id).await?;

        let newly_completed = matches!(
            (update.status, meeting.status),
            (Some(MeetingStatus::Completed), MeetingStatus::Scheduled | MeetingStatus::Missed)
        );

        if let Some(status) = update.status {
            meeting.status = status;
        }
        if let Some(notes) = update.notes {
            meeting.notes = Some(notes);
        }
        meeting.updated_at = Utc::now();

        self.meetings.update(&meeting).await?;

        if newly_completed {
            match self.agents.record_completion(&meeting.assigned_to).await {
                Ok(()) => {}
                Err(OpenHouseError::NotFound(_)) => {
                    warn!(
                        assignee = %meeting.assigned_to,
                        "meeting completed for assignee without an agent record"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(meeting)
    }
}
