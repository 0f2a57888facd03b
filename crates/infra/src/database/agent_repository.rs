//! SQLite implementation of the AgentRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveTime, Utc};
use openhouse_domain::{Agent, OpenHouseError, Page, Result, WorkingHours};
use rusqlite::{params, Connection, Row};

use super::{bad_column, datetime_from_ts, DbManager};
use crate::errors::InfraError;

const AGENT_COLUMNS: &str = "id, name, email, phone, calendar_id, working_days, working_start,
     working_end, meeting_duration_min, buffer_min, timezone, is_active, total_meetings,
     completed_meetings, created_at, updated_at";

/// SQLite implementation of AgentRepository
pub struct SqliteAgentRepository {
    db: Arc<DbManager>,
}

impl SqliteAgentRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

pub(crate) fn insert_agent_row(conn: &Connection, agent: &Agent) -> rusqlite::Result<()> {
    let working_days = serde_json::to_string(&agent.working_days)
        .map_err(|err| bad_column(5, format!("working days: {err}")))?;

    conn.execute(
        "INSERT INTO agents (
            id, name, email, phone, calendar_id, working_days, working_start,
            working_end, meeting_duration_min, buffer_min, timezone, is_active,
            total_meetings, completed_meetings, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            agent.id,
            agent.name,
            agent.email,
            agent.phone,
            agent.calendar_id,
            working_days,
            format_time(agent.working_hours.start),
            format_time(agent.working_hours.end),
            agent.meeting_duration_min,
            agent.buffer_min,
            agent.timezone,
            agent.is_active,
            agent.total_meetings,
            agent.completed_meetings,
            agent.created_at.timestamp(),
            agent.updated_at.timestamp(),
        ],
    )?;
    Ok(())
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn parse_time(value: &str, index: usize) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|err| bad_column(index, format!("working hours: {err}")))
}

pub(crate) fn row_to_agent(row: &Row<'_>) -> rusqlite::Result<Agent> {
    let working_days: String = row.get(5)?;
    let working_days: Vec<String> = serde_json::from_str(&working_days)
        .map_err(|err| bad_column(5, format!("working days: {err}")))?;
    let start: String = row.get(6)?;
    let end: String = row.get(7)?;

    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        calendar_id: row.get(4)?,
        working_days,
        working_hours: WorkingHours { start: parse_time(&start, 6)?, end: parse_time(&end, 7)? },
        meeting_duration_min: row.get(8)?,
        buffer_min: row.get(9)?,
        timezone: row.get(10)?,
        is_active: row.get(11)?,
        total_meetings: row.get(12)?,
        completed_meetings: row.get(13)?,
        created_at: datetime_from_ts(row.get(14)?),
        updated_at: datetime_from_ts(row.get(15)?),
    })
}

#[async_trait]
impl openhouse_core::AgentRepository for SqliteAgentRepository {
    async fn insert(&self, agent: &Agent) -> Result<()> {
        let conn = self.db.get()?;
        insert_agent_row(&conn, agent).map_err(|err| InfraError::from(err).into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Agent>> {
        let conn = self.db.get()?;
        let result = conn.query_row(
            &format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = ?1"),
            params![id],
            row_to_agent,
        );
        match result {
            Ok(agent) => Ok(Some(agent)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>> {
        let conn = self.db.get()?;
        let result = conn.query_row(
            &format!("SELECT {AGENT_COLUMNS} FROM agents WHERE email = ?1"),
            params![email],
            row_to_agent,
        );
        match result {
            Ok(agent) => Ok(Some(agent)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Agent>> {
        let conn = self.db.get()?;
        let result = conn.query_row(
            &format!("SELECT {AGENT_COLUMNS} FROM agents WHERE name = ?1 LIMIT 1"),
            params![name],
            row_to_agent,
        );
        match result {
            Ok(agent) => Ok(Some(agent)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn list(&self, only_active: bool, page: Page) -> Result<Vec<Agent>> {
        let conn = self.db.get()?;
        let sql = format!(
            "SELECT {AGENT_COLUMNS} FROM agents{} ORDER BY created_at ASC LIMIT {} OFFSET {}",
            if only_active { " WHERE is_active = 1" } else { "" },
            page.limit,
            page.offset,
        );
        let mut statement = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = statement.query_map(params![], row_to_agent).map_err(InfraError::from)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|err| InfraError::from(err).into())
    }

    async fn find_bookable(&self) -> Result<Vec<Agent>> {
        let conn = self.db.get()?;
        let mut statement = conn
            .prepare(&format!(
                "SELECT {AGENT_COLUMNS} FROM agents
                 WHERE is_active = 1 AND calendar_id IS NOT NULL
                 ORDER BY created_at ASC"
            ))
            .map_err(InfraError::from)?;
        let rows = statement.query_map(params![], row_to_agent).map_err(InfraError::from)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|err| InfraError::from(err).into())
    }

    async fn update(&self, agent: &Agent) -> Result<()> {
        let conn = self.db.get()?;
        let working_days = serde_json::to_string(&agent.working_days)
            .map_err(|err| OpenHouseError::Database(format!("working days: {err}")))?;
        let changed = conn
            .execute(
                "UPDATE agents SET
                    name = ?2, email = ?3, phone = ?4, calendar_id = ?5, working_days = ?6,
                    working_start = ?7, working_end = ?8, meeting_duration_min = ?9,
                    buffer_min = ?10, timezone = ?11, is_active = ?12, total_meetings = ?13,
                    completed_meetings = ?14, updated_at = ?15
                 WHERE id = ?1",
                params![
                    agent.id,
                    agent.name,
                    agent.email,
                    agent.phone,
                    agent.calendar_id,
                    working_days,
                    format_time(agent.working_hours.start),
                    format_time(agent.working_hours.end),
                    agent.meeting_duration_min,
                    agent.buffer_min,
                    agent.timezone,
                    agent.is_active,
                    agent.total_meetings,
                    agent.completed_meetings,
                    agent.updated_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;
        if changed == 0 {
            return Err(OpenHouseError::NotFound(format!("agent {} not found", agent.id)));
        }
        Ok(())
    }

    async fn record_completion(&self, agent_name: &str) -> Result<()> {
        let conn = self.db.get()?;
        let changed = conn
            .execute(
                "UPDATE agents SET completed_meetings = completed_meetings + 1, updated_at = ?2
                 WHERE name = ?1",
                params![agent_name, Utc::now().timestamp()],
            )
            .map_err(InfraError::from)?;
        if changed == 0 {
            return Err(OpenHouseError::NotFound(format!("agent {agent_name} not found")));
        }
        Ok(())
    }
}
