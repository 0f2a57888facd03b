//! Agent service - CRUD and calendar passthrough

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use openhouse_domain::agent::{validate_buffer, validate_meeting_duration};
use openhouse_domain::{
    normalize_email, Agent, AgentUpdate, NewAgent, OpenHouseError, Page, Result,
};
use tracing::info;

use crate::booking::ports::AgentRepository;
use crate::scheduling::ports::{CalendarPort, UpcomingEvent};

/// Agent CRUD service
pub struct AgentService {
    agents: Arc<dyn AgentRepository>,
    calendar: Arc<dyn CalendarPort>,
}

impl AgentService {
    pub fn new(agents: Arc<dyn AgentRepository>, calendar: Arc<dyn CalendarPort>) -> Self {
        Self { agents, calendar }
    }

    pub async fn create(&self, fields: NewAgent) -> Result<Agent> {
        fields.validate()?;
        validate_timezone(&fields.timezone)?;
        let email = normalize_email(&fields.email);
        if self.agents.find_by_email(&email).await?.is_some() {
            return Err(OpenHouseError::Conflict(format!(
                "an agent with email {email} already exists"
            )));
        }
        let agent = fields.into_agent();
        self.agents.insert(&agent).await?;
        info!(agent = %agent.email, "agent created");
        Ok(agent)
    }

    pub async fn get(&self, id: &str) -> Result<Agent> {
        self.agents
            .find_by_id(id)
            .await?
            .ok_or_else(|| OpenHouseError::NotFound(format!("agent {id} not found")))
    }

    pub async fn list(&self, only_active: bool, page: Page) -> Result<Vec<Agent>> {
        self.agents.list(only_active, page).await
    }

    pub async fn update(&self, id: &str, update: AgentUpdate) -> Result<Agent> {
        let mut agent = self.get(id).await?;

        if let Some(name) = update.name {
            agent.name = name;
        }
        if let Some(phone) = update.phone {
            agent.phone = Some(phone);
        }
        if let Some(calendar_id) = update.calendar_id {
            agent.calendar_id = Some(calendar_id);
        }
        if let Some(working_days) = update.working_days {
            agent.working_days =
                working_days.iter().map(|day| day.to_ascii_lowercase()).collect();
        }
        if let Some(working_hours) = update.working_hours {
            agent.working_hours = working_hours;
        }
        if let Some(duration) = update.meeting_duration_min {
            validate_meeting_duration(duration)?;
            agent.meeting_duration_min = duration;
        }
        if let Some(buffer) = update.buffer_min {
            validate_buffer(buffer)?;
            agent.buffer_min = buffer;
        }
        if let Some(timezone) = update.timezone {
            validate_timezone(&timezone)?;
            agent.timezone = timezone;
        }
        if let Some(is_active) = update.is_active {
            agent.is_active = is_active;
        }
        agent.updated_at = Utc::now();

        self.agents.update(&agent).await?;
        Ok(agent)
    }

    /// Pass-through to the calendar provider. Errors surface to the caller
    /// here (unlike the booking flow) because this endpoint exists to show
    /// real calendar state.
    pub async fn upcoming_events(&self, id: &str, max: usize) -> Result<Vec<UpcomingEvent>> {
        let agent = self.get(id).await?;
        let Some(calendar_id) = agent.calendar_id.as_deref() else {
            return Err(OpenHouseError::InvalidInput(format!(
                "agent {} has no calendar integration",
                agent.email
            )));
        };
        self.calendar.list_upcoming(calendar_id, max).await
    }
}

fn validate_timezone(name: &str) -> Result<()> {
    name.parse::<Tz>()
        .map(|_| ())
        .map_err(|_| OpenHouseError::InvalidInput(format!("unknown timezone: {name}")))
}
