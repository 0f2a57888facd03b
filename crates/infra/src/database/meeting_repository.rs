//! SQLite implementation of the MeetingRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openhouse_domain::{
    Meeting, MeetingFilter, MeetingStatus, OpenHouseError, Page, Result,
};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};

use super::{bad_column, datetime_from_ts, DbManager};
use crate::errors::InfraError;

const MEETING_COLUMNS: &str = "id, lead_name, property_address, start_ts, duration_min, status,
     assigned_to, notes, calendar_event_id, calendar_event_link, created_at, updated_at";

/// SQLite implementation of MeetingRepository
pub struct SqliteMeetingRepository {
    db: Arc<DbManager>,
}

impl SqliteMeetingRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

pub(crate) fn insert_meeting_row(conn: &Connection, meeting: &Meeting) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO meetings (
            id, lead_name, property_address, start_ts, duration_min, status,
            assigned_to, notes, calendar_event_id, calendar_event_link,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            meeting.id,
            meeting.lead_name,
            meeting.property_address,
            meeting.date_time.timestamp(),
            meeting.duration_min,
            meeting.status.as_str(),
            meeting.assigned_to,
            meeting.notes,
            meeting.calendar_event_id,
            meeting.calendar_event_link,
            meeting.created_at.timestamp(),
            meeting.updated_at.timestamp(),
        ],
    )?;
    Ok(())
}

pub(crate) fn row_to_meeting(row: &Row<'_>) -> rusqlite::Result<Meeting> {
    let status: String = row.get(5)?;
    let status = MeetingStatus::parse(&status)
        .map_err(|err| bad_column(5, format!("meeting status: {err}")))?;

    Ok(Meeting {
        id: row.get(0)?,
        lead_name: row.get(1)?,
        property_address: row.get(2)?,
        date_time: datetime_from_ts(row.get(3)?),
        duration_min: row.get(4)?,
        status,
        assigned_to: row.get(6)?,
        notes: row.get(7)?,
        calendar_event_id: row.get(8)?,
        calendar_event_link: row.get(9)?,
        created_at: datetime_from_ts(row.get(10)?),
        updated_at: datetime_from_ts(row.get(11)?),
    })
}

#[async_trait]
impl openhouse_core::MeetingRepository for SqliteMeetingRepository {
    async fn insert(&self, meeting: &Meeting) -> Result<()> {
        let conn = self.db.get()?;
        insert_meeting_row(&conn, meeting).map_err(|err| InfraError::from(err).into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Meeting>> {
        let conn = self.db.get()?;
        let result = conn.query_row(
            &format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?1"),
            params![id],
            row_to_meeting,
        );
        match result {
            Ok(meeting) => Ok(Some(meeting)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn list(&self, filter: &MeetingFilter, page: Page) -> Result<Vec<Meeting>> {
        let conn = self.db.get()?;

        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(assigned_to) = &filter.assigned_to {
            values.push(Value::from(assigned_to.clone()));
            clauses.push(format!("assigned_to = ?{}", values.len()));
        }
        if let Some(status) = filter.status {
            values.push(Value::from(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(from) = filter.from {
            values.push(Value::from(from.timestamp()));
            clauses.push(format!("start_ts >= ?{}", values.len()));
        }
        if let Some(to) = filter.to {
            values.push(Value::from(to.timestamp()));
            clauses.push(format!("start_ts <= ?{}", values.len()));
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT {MEETING_COLUMNS} FROM meetings{where_clause}
             ORDER BY start_ts ASC LIMIT {} OFFSET {}",
            page.limit, page.offset,
        );
        let mut statement = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = statement
            .query_map(rusqlite::params_from_iter(values), row_to_meeting)
            .map_err(InfraError::from)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|err| InfraError::from(err).into())
    }

    async fn scheduled_for_assignee(
        &self,
        assigned_to: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Meeting>> {
        let conn = self.db.get()?;
        let mut statement = conn
            .prepare(&format!(
                "SELECT {MEETING_COLUMNS} FROM meetings
                 WHERE assigned_to = ?1 AND status = 'scheduled'
                   AND start_ts >= ?2 AND start_ts <= ?3
                 ORDER BY start_ts ASC"
            ))
            .map_err(InfraError::from)?;
        let rows = statement
            .query_map(params![assigned_to, from.timestamp(), to.timestamp()], row_to_meeting)
            .map_err(InfraError::from)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|err| InfraError::from(err).into())
    }

    async fn update(&self, meeting: &Meeting) -> Result<()> {
        let conn = self.db.get()?;
        let changed = conn
            .execute(
                "UPDATE meetings SET
                    lead_name = ?2, property_address = ?3, start_ts = ?4, duration_min = ?5,
                    status = ?6, assigned_to = ?7, notes = ?8, calendar_event_id = ?9,
                    calendar_event_link = ?10, updated_at = ?11
                 WHERE id = ?1",
                params![
                    meeting.id,
                    meeting.lead_name,
                    meeting.property_address,
                    meeting.date_time.timestamp(),
                    meeting.duration_min,
                    meeting.status.as_str(),
                    meeting.assigned_to,
                    meeting.notes,
                    meeting.calendar_event_id,
                    meeting.calendar_event_link,
                    meeting.updated_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;
        if changed == 0 {
            return Err(OpenHouseError::NotFound(format!("meeting {} not found", meeting.id)));
        }
        Ok(())
    }
}
