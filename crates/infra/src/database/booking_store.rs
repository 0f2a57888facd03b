//! SQLite implementation of the atomic booking store.
//!
//! One rusqlite transaction carries every write of a booking attempt: the
//! lead row, the optional meeting row, and the agent's total-meetings
//! counter. A failure anywhere before the commit rolls everything back when
//! the transaction drops; the unique index on `leads.email` is the durable
//! cross-request backstop and surfaces as `Conflict`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use openhouse_core::booking::ports::{BookingStore, BookingUnit};
use openhouse_domain::{OpenHouseError, Result};
use rusqlite::params;
use tracing::{debug, instrument};

use super::lead_repository::insert_lead_row;
use super::meeting_repository::insert_meeting_row;
use super::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of BookingStore
pub struct SqliteBookingStore {
    db: Arc<DbManager>,
}

impl SqliteBookingStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    #[instrument(skip(self, unit), fields(lead = %unit.lead.email))]
    async fn commit(&self, unit: BookingUnit) -> Result<()> {
        let mut conn = self.db.get()?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        insert_lead_row(&tx, &unit.lead).map_err(InfraError::from)?;

        if let Some(meeting) = &unit.meeting {
            insert_meeting_row(&tx, meeting).map_err(InfraError::from)?;
        }

        if let Some(agent_id) = &unit.booked_agent_id {
            let changed = tx
                .execute(
                    "UPDATE agents SET total_meetings = total_meetings + 1, updated_at = ?2
                     WHERE id = ?1",
                    params![agent_id, Utc::now().timestamp()],
                )
                .map_err(InfraError::from)?;
            if changed == 0 {
                // Transaction drops here, rolling back the lead and meeting.
                return Err(OpenHouseError::NotFound(format!("agent {agent_id} not found")));
            }
        }

        tx.commit().map_err(InfraError::from)?;
        debug!(
            meeting = unit.meeting.is_some(),
            counter = unit.booked_agent_id.is_some(),
            "booking unit committed"
        );
        Ok(())
    }
}
