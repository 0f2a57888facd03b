//! Calendar availability checks over the provider port.
//!
//! Provider failures degrade according to the configured policy. The default
//! is fail-open: an unreachable calendar reads as "free" so an integration
//! outage degrades to manual coordination instead of refusing every booking.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use openhouse_domain::{Agent, Slot};
use tracing::warn;

use super::ports::CalendarPort;
use super::slots::WorkSchedule;

/// Answers "is this window actually free" by combining generated candidates
/// with the provider's busy data.
pub struct AvailabilityService {
    calendar: Arc<dyn CalendarPort>,
    fail_open: bool,
}

impl AvailabilityService {
    pub fn new(calendar: Arc<dyn CalendarPort>, fail_open: bool) -> Self {
        Self { calendar, fail_open }
    }

    /// Whether the agent's calendar is free for the exact window.
    ///
    /// An agent without calendar integration is always "free": there is no
    /// busy data to consult, and blocking on a missing integration would
    /// stall the whole flow.
    pub async fn is_free(
        &self,
        agent: &Agent,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        let Some(calendar_id) = agent.calendar_id.as_deref() else {
            return true;
        };

        match self.calendar.is_slot_free(calendar_id, start, end).await {
            Ok(free) => free,
            Err(err) => {
                warn!(
                    agent = %agent.email,
                    error = %err,
                    fail_open = self.fail_open,
                    "calendar availability check failed"
                );
                self.fail_open
            }
        }
    }

    /// Free slots for one day, in generated order, capped at `cap` when
    /// given. One provider round-trip per candidate; candidates are few
    /// (bounded by working hours / meeting length).
    pub async fn free_slots_for_day(
        &self,
        agent: &Agent,
        schedule: &WorkSchedule,
        date: NaiveDate,
        cap: Option<usize>,
    ) -> Vec<Slot> {
        let mut slots = Vec::new();
        for window in schedule.windows_for_day(date) {
            if self.is_free(agent, window.start, window.end).await {
                slots.push(Slot {
                    agent_id: agent.id.clone(),
                    start: window.start,
                    end: window.end,
                });
                if cap.is_some_and(|cap| slots.len() >= cap) {
                    break;
                }
            }
        }
        slots
    }

    /// Free slots strictly after `after`, scanning forward up to
    /// `lookahead_days`.
    pub async fn upcoming_slots(
        &self,
        agent: &Agent,
        schedule: &WorkSchedule,
        after: DateTime<Utc>,
        lookahead_days: u32,
        cap: Option<usize>,
    ) -> Vec<Slot> {
        let mut slots = Vec::new();
        for window in schedule.windows_from(after, lookahead_days) {
            if self.is_free(agent, window.start, window.end).await {
                slots.push(Slot {
                    agent_id: agent.id.clone(),
                    start: window.start,
                    end: window.end,
                });
                if cap.is_some_and(|cap| slots.len() >= cap) {
                    break;
                }
            }
        }
        slots
    }
}
