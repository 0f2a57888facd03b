//! SQLite implementation of the LeadRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use openhouse_domain::{
    Lead, LeadFilter, LeadStats, LeadStatus, Page, Result, SortKey, SortOrder,
};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::{bad_column, datetime_from_ts, DbManager};
use crate::errors::InfraError;

const LEAD_COLUMNS: &str = "id, name, email, phone, status, source, assigned_agent, budget,
     property_type_preference, timeline, notes, last_contacted_at, created_at, updated_at";

/// SQLite implementation of LeadRepository
pub struct SqliteLeadRepository {
    db: Arc<DbManager>,
}

impl SqliteLeadRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

pub(crate) fn insert_lead_row(conn: &Connection, lead: &Lead) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO leads (
            id, name, email, phone, status, source, assigned_agent, budget,
            property_type_preference, timeline, notes, last_contacted_at,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            lead.id,
            lead.name,
            lead.email,
            lead.phone,
            lead.status.as_str(),
            lead.source,
            lead.assigned_agent,
            lead.budget,
            lead.property_type_preference,
            lead.timeline,
            lead.notes,
            lead.last_contacted_at.timestamp(),
            lead.created_at.timestamp(),
            lead.updated_at.timestamp(),
        ],
    )?;
    Ok(())
}

pub(crate) fn row_to_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let status: String = row.get(4)?;
    let status = LeadStatus::parse(&status)
        .map_err(|err| bad_column(4, format!("lead status: {err}")))?;

    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        status,
        source: row.get(5)?,
        assigned_agent: row.get(6)?,
        budget: row.get(7)?,
        property_type_preference: row.get(8)?,
        timeline: row.get(9)?,
        notes: row.get(10)?,
        last_contacted_at: datetime_from_ts(row.get(11)?),
        created_at: datetime_from_ts(row.get(12)?),
        updated_at: datetime_from_ts(row.get(13)?),
    })
}

/// WHERE clause + parameters for a lead filter.
fn filter_clause(filter: &LeadFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(status) = filter.status {
        values.push(Value::from(status.as_str().to_string()));
        clauses.push(format!("status = ?{}", values.len()));
    }
    if let Some(assigned) = &filter.assigned_agent {
        values.push(Value::from(assigned.clone()));
        clauses.push(format!("assigned_agent = ?{}", values.len()));
    }
    if let Some(search) = &filter.search {
        values.push(Value::from(format!("%{}%", search.to_ascii_lowercase())));
        let index = values.len();
        clauses.push(format!("(LOWER(name) LIKE ?{index} OR email LIKE ?{index})"));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

#[async_trait]
impl openhouse_core::LeadRepository for SqliteLeadRepository {
    #[instrument(skip(self, lead), fields(lead_id = %lead.id))]
    async fn insert(&self, lead: &Lead) -> Result<()> {
        let conn = self.db.get()?;
        insert_lead_row(&conn, lead).map_err(|err| InfraError::from(err).into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>> {
        let conn = self.db.get()?;
        let result = conn.query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
            params![id],
            row_to_lead,
        );
        match result {
            Ok(lead) => Ok(Some(lead)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Lead>> {
        let conn = self.db.get()?;
        let result = conn.query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE email = ?1"),
            params![email],
            row_to_lead,
        );
        match result {
            Ok(lead) => Ok(Some(lead)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn list(
        &self,
        filter: &LeadFilter,
        sort: SortKey,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Lead>> {
        let conn = self.db.get()?;
        let (where_clause, values) = filter_clause(filter);
        let sql = format!(
            "SELECT {LEAD_COLUMNS} FROM leads{where_clause}
             ORDER BY {} {} LIMIT {} OFFSET {}",
            sort.column(),
            order.keyword(),
            page.limit,
            page.offset,
        );

        let mut statement = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = statement
            .query_map(rusqlite::params_from_iter(values), row_to_lead)
            .map_err(InfraError::from)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|err| InfraError::from(err).into())
    }

    async fn count(&self, filter: &LeadFilter) -> Result<u64> {
        let conn = self.db.get()?;
        let (where_clause, values) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM leads{where_clause}");
        conn.query_row(&sql, rusqlite::params_from_iter(values), |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })
        .map_err(|err| InfraError::from(err).into())
    }

    async fn stats(&self) -> Result<LeadStats> {
        let conn = self.db.get()?;
        let mut statement = conn
            .prepare("SELECT status, COUNT(*) FROM leads GROUP BY status")
            .map_err(InfraError::from)?;
        let rows = statement
            .query_map(params![], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })
            .map_err(InfraError::from)?;

        let mut stats = LeadStats::default();
        for row in rows {
            let (status, count) = row.map_err(InfraError::from)?;
            stats.total += count;
            match LeadStatus::parse(&status) {
                Ok(LeadStatus::New) => stats.new = count,
                Ok(LeadStatus::Contacted) => stats.contacted = count,
                Ok(LeadStatus::Nurturing) => stats.nurturing = count,
                Ok(LeadStatus::Closed) => stats.closed = count,
                Err(_) => {}
            }
        }
        Ok(stats)
    }

    async fn update(&self, lead: &Lead) -> Result<()> {
        let conn = self.db.get()?;
        let changed = conn
            .execute(
                "UPDATE leads SET
                    name = ?2, email = ?3, phone = ?4, status = ?5, source = ?6,
                    assigned_agent = ?7, budget = ?8, property_type_preference = ?9,
                    timeline = ?10, notes = ?11, last_contacted_at = ?12, updated_at = ?13
                 WHERE id = ?1",
                params![
                    lead.id,
                    lead.name,
                    lead.email,
                    lead.phone,
                    lead.status.as_str(),
                    lead.source,
                    lead.assigned_agent,
                    lead.budget,
                    lead.property_type_preference,
                    lead.timeline,
                    lead.notes,
                    lead.last_contacted_at.timestamp(),
                    lead.updated_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;
        if changed == 0 {
            return Err(openhouse_domain::OpenHouseError::NotFound(format!(
                "lead {} not found",
                lead.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.db.get()?;
        let changed = conn
            .execute("DELETE FROM leads WHERE id = ?1", params![id])
            .map_err(InfraError::from)?;
        if changed == 0 {
            return Err(openhouse_domain::OpenHouseError::NotFound(format!(
                "lead {id} not found"
            )));
        }
        Ok(())
    }
}
