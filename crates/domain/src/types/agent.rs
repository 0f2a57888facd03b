//! Agent types
//!
//! An agent is bookable when they are active and have a linked calendar.
//! Working-schedule fields drive candidate slot generation; the counters are
//! only ever mutated by the booking commit and by meeting completion.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_BUFFER_MIN, DEFAULT_MEETING_DURATION_MIN, MAX_BUFFER_MIN, MAX_MEETING_DURATION_MIN,
    MIN_BUFFER_MIN, MIN_MEETING_DURATION_MIN,
};
use crate::errors::{OpenHouseError, Result};
use crate::utils::contact::{is_valid_email, normalize_email};

/// Local working hours, interpreted in the agent's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Agent record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// Normalized (lowercased) email; unique per agent.
    pub email: String,
    pub phone: Option<String>,
    /// External calendar reference. `None` means "not integrated".
    pub calendar_id: Option<String>,
    /// Lowercase weekday names, e.g. `["monday", "tuesday"]`.
    pub working_days: Vec<String>,
    pub working_hours: WorkingHours,
    pub meeting_duration_min: i64,
    pub buffer_min: i64,
    /// IANA timezone name, e.g. `"America/New_York"`.
    pub timezone: String,
    pub is_active: bool,
    pub total_meetings: i64,
    pub completed_meetings: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// An agent can take automated bookings only when active and
    /// calendar-linked.
    pub fn is_bookable(&self) -> bool {
        self.is_active && self.calendar_id.is_some()
    }

    /// Completed / total, 0.0 when nothing has been booked yet.
    pub fn success_rate(&self) -> f64 {
        if self.total_meetings <= 0 {
            0.0
        } else {
            self.completed_meetings as f64 / self.total_meetings as f64
        }
    }

    pub fn meeting_duration(&self) -> Duration {
        Duration::minutes(self.meeting_duration_min)
    }

    pub fn buffer(&self) -> Duration {
        Duration::minutes(self.buffer_min)
    }
}

fn default_working_days() -> Vec<String> {
    ["monday", "tuesday", "wednesday", "thursday", "friday"]
        .iter()
        .map(|d| (*d).to_string())
        .collect()
}

fn default_meeting_duration() -> i64 {
    DEFAULT_MEETING_DURATION_MIN
}

fn default_buffer() -> i64 {
    DEFAULT_BUFFER_MIN
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_active() -> bool {
    true
}

/// Fields accepted when creating an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default = "default_working_days")]
    pub working_days: Vec<String>,
    #[serde(default)]
    pub working_hours: WorkingHours,
    #[serde(default = "default_meeting_duration")]
    pub meeting_duration_min: i64,
    #[serde(default = "default_buffer")]
    pub buffer_min: i64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewAgent {
    /// Bounds-check schedule fields and the email before anything is written.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("agent name is required".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(OpenHouseError::InvalidInput(format!(
                "invalid agent email: {}",
                self.email
            )));
        }
        validate_meeting_duration(self.meeting_duration_min)?;
        validate_buffer(self.buffer_min)?;
        Ok(())
    }

    /// Materialize the agent record, normalizing identity fields.
    pub fn into_agent(self) -> Agent {
        let now = Utc::now();
        Agent {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            email: normalize_email(&self.email),
            phone: self.phone,
            calendar_id: self.calendar_id,
            working_days: self.working_days.iter().map(|d| d.to_ascii_lowercase()).collect(),
            working_hours: self.working_hours,
            meeting_duration_min: self.meeting_duration_min,
            buffer_min: self.buffer_min,
            timezone: self.timezone,
            is_active: self.is_active,
            total_meetings: 0,
            completed_meetings: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn validate_meeting_duration(minutes: i64) -> Result<()> {
    if !(MIN_MEETING_DURATION_MIN..=MAX_MEETING_DURATION_MIN).contains(&minutes) {
        return Err(OpenHouseError::InvalidInput(format!(
            "meeting duration must be between {MIN_MEETING_DURATION_MIN} and {MAX_MEETING_DURATION_MIN} minutes, got {minutes}"
        )));
    }
    Ok(())
}

pub fn validate_buffer(minutes: i64) -> Result<()> {
    if !(MIN_BUFFER_MIN..=MAX_BUFFER_MIN).contains(&minutes) {
        return Err(OpenHouseError::InvalidInput(format!(
            "buffer time must be between {MIN_BUFFER_MIN} and {MAX_BUFFER_MIN} minutes, got {minutes}"
        )));
    }
    Ok(())
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default)]
    pub working_days: Option<Vec<String>>,
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
    #[serde(default)]
    pub meeting_duration_min: Option<i64>,
    #[serde(default)]
    pub buffer_min: Option<i64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Slimmed agent view embedded in booking and availability responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&Agent> for AgentContact {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.clone(),
            name: agent.name.clone(),
            email: agent.email.clone(),
            phone: agent.phone.clone(),
        }
    }
}
