//! Lead service - CRUD and webhook ingestion
//!
//! Two deliberately different duplicate policies live here. Direct creation
//! treats a duplicate email as `Conflict`; webhook ingestion merges the
//! resubmitted fields into the existing lead instead, because external form
//! providers retry and resubmit freely.

use std::sync::Arc;

use chrono::Utc;
use openhouse_domain::{
    is_valid_email, normalize_email, Lead, LeadFilter, LeadStats, LeadUpdate, NewLead,
    OpenHouseError, Page, Result, SortKey, SortOrder,
};
use tracing::info;

use crate::booking::ports::LeadRepository;
use crate::notify::NotificationFanout;

/// Lead CRUD and webhook ingestion service
pub struct LeadService {
    leads: Arc<dyn LeadRepository>,
    notifications: Arc<NotificationFanout>,
}

impl LeadService {
    pub fn new(leads: Arc<dyn LeadRepository>, notifications: Arc<NotificationFanout>) -> Self {
        Self { leads, notifications }
    }

    /// Create a lead; duplicate email is a `Conflict`.
    pub async fn create(&self, fields: NewLead) -> Result<Lead> {
        validate_fields(&fields)?;
        let email = normalize_email(&fields.email);
        if self.leads.find_by_email(&email).await?.is_some() {
            return Err(OpenHouseError::Conflict(format!(
                "a lead with email {email} already exists"
            )));
        }
        let lead = Lead::create(fields);
        self.leads.insert(&lead).await?;
        info!(lead = %lead.email, "lead created");
        Ok(lead)
    }

    /// Webhook ingestion with merge semantics. Returns the lead and whether
    /// it was newly created.
    pub async fn ingest(&self, fields: NewLead) -> Result<(Lead, bool)> {
        validate_fields(&fields)?;
        let email = normalize_email(&fields.email);

        if let Some(mut existing) = self.leads.find_by_email(&email).await? {
            merge_fields(&mut existing, fields);
            existing.last_contacted_at = Utc::now();
            existing.updated_at = Utc::now();
            self.leads.update(&existing).await?;
            info!(lead = %existing.email, "webhook resubmission merged into existing lead");
            return Ok((existing, false));
        }

        let lead = Lead::create(fields);
        self.leads.insert(&lead).await?;
        info!(lead = %lead.email, "lead ingested from webhook");

        let notifications = Arc::clone(&self.notifications);
        let captured = lead.clone();
        tokio::spawn(async move {
            notifications.lead_captured(&captured).await;
        });

        Ok((lead, true))
    }

    /// Lookup by email (normalized here).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Lead>> {
        self.leads.find_by_email(&normalize_email(email)).await
    }

    pub async fn get(&self, id: &str) -> Result<Lead> {
        self.leads
            .find_by_id(id)
            .await?
            .ok_or_else(|| OpenHouseError::NotFound(format!("lead {id} not found")))
    }

    pub async fn list(
        &self,
        filter: &LeadFilter,
        sort: SortKey,
        order: SortOrder,
        page: Page,
    ) -> Result<(Vec<Lead>, u64)> {
        let rows = self.leads.list(filter, sort, order, page).await?;
        let total = self.leads.count(filter).await?;
        Ok((rows, total))
    }

    pub async fn stats(&self) -> Result<LeadStats> {
        self.leads.stats().await
    }

    /// Apply a partial update. A status change counts as contact, so it
    /// refreshes `last_contacted_at`.
    pub async fn update(&self, id: &str, update: LeadUpdate) -> Result<Lead> {
        if update.is_empty() {
            return Err(OpenHouseError::InvalidInput("no fields to update".into()));
        }
        let mut lead = self.get(id).await?;

        if let Some(name) = update.name {
            lead.name = name;
        }
        if let Some(phone) = update.phone {
            lead.phone = Some(phone);
        }
        if let Some(status) = update.status {
            if status != lead.status {
                lead.last_contacted_at = Utc::now();
            }
            lead.status = status;
        }
        if let Some(source) = update.source {
            lead.source = Some(source);
        }
        if let Some(assigned_agent) = update.assigned_agent {
            lead.assigned_agent = assigned_agent;
        }
        if let Some(budget) = update.budget {
            lead.budget = Some(budget);
        }
        if let Some(preference) = update.property_type_preference {
            lead.property_type_preference = Some(preference);
        }
        if let Some(timeline) = update.timeline {
            lead.timeline = Some(timeline);
        }
        if let Some(notes) = update.notes {
            lead.notes = Some(notes);
        }
        lead.updated_at = Utc::now();

        self.leads.update(&lead).await?;
        Ok(lead)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        // Surface NotFound for unknown ids instead of a silent no-op.
        self.get(id).await?;
        self.leads.delete(id).await
    }
}

fn validate_fields(fields: &NewLead) -> Result<()> {
    if fields.name.trim().is_empty() {
        return Err(OpenHouseError::InvalidInput("name is required".into()));
    }
    if !is_valid_email(&fields.email) {
        return Err(OpenHouseError::InvalidInput(format!("invalid email: {}", fields.email)));
    }
    Ok(())
}

/// Overlay the resubmitted fields onto the stored lead. Identity (email) and
/// pipeline state (status, assignment) are left alone.
fn merge_fields(lead: &mut Lead, fields: NewLead) {
    if !fields.name.trim().is_empty() {
        lead.name = fields.name;
    }
    if fields.phone.is_some() {
        lead.phone = fields.phone;
    }
    if fields.source.is_some() {
        lead.source = fields.source;
    }
    if fields.budget.is_some() {
        lead.budget = fields.budget;
    }
    if fields.property_type_preference.is_some() {
        lead.property_type_preference = fields.property_type_preference;
    }
    if fields.timeline.is_some() {
        lead.timeline = fields.timeline;
    }
    if fields.notes.is_some() {
        lead.notes = fields.notes;
    }
}
