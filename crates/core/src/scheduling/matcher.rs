//! First-fit agent/slot selection.
//!
//! Agents are tried strictly in the order the caller supplies them; the
//! first sufficiently-available agent wins. There is no load balancing here:
//! callers that need fairness pre-sort the candidate list.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use openhouse_domain::{Agent, Slot};
use tracing::{debug, warn};

use super::availability::AvailabilityService;
use super::slots::WorkSchedule;

/// A matched agent and the slot to book with them.
#[derive(Debug, Clone)]
pub struct SlotMatch {
    pub agent: Agent,
    pub slot: Slot,
}

pub struct AgentMatcher {
    availability: Arc<AvailabilityService>,
    lookahead_days: u32,
}

impl AgentMatcher {
    pub fn new(availability: Arc<AvailabilityService>, lookahead_days: u32) -> Self {
        Self { availability, lookahead_days }
    }

    /// Find the first agent/slot pair.
    ///
    /// With a preferred time, the first agent free for exactly that window
    /// wins. Otherwise (or when nobody can take the preferred time), the
    /// first agent with any upcoming open slot wins, taking their earliest
    /// one.
    pub async fn select(
        &self,
        agents: &[Agent],
        preferred: Option<DateTime<Utc>>,
        search_from: DateTime<Utc>,
    ) -> Option<SlotMatch> {
        if let Some(preferred) = preferred {
            for agent in agents {
                let end = preferred + agent.meeting_duration();
                if self.availability.is_free(agent, preferred, end).await {
                    debug!(agent = %agent.email, start = %preferred, "preferred slot matched");
                    return Some(SlotMatch {
                        agent: agent.clone(),
                        slot: Slot { agent_id: agent.id.clone(), start: preferred, end },
                    });
                }
            }
            debug!(start = %preferred, "no agent free at preferred time, scanning forward");
        }

        for agent in agents {
            let schedule = match WorkSchedule::for_agent(agent) {
                Ok(schedule) => schedule,
                Err(err) => {
                    warn!(agent = %agent.email, error = %err, "skipping agent with invalid schedule");
                    continue;
                }
            };
            let slots = self
                .availability
                .upcoming_slots(agent, &schedule, search_from, self.lookahead_days, Some(1))
                .await;
            if let Some(slot) = slots.into_iter().next() {
                debug!(agent = %agent.email, start = %slot.start, "next open slot matched");
                return Some(SlotMatch { agent: agent.clone(), slot });
            }
        }
        None
    }
}
