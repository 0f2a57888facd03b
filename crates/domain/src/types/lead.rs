//! Lead types
//!
//! A lead is an inbound prospect. Identity is the email address,
//! case-insensitive; the record store enforces uniqueness durably.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::AUTO_ASSIGNED_PLACEHOLDER;
use crate::errors::{OpenHouseError, Result};
use crate::utils::contact::normalize_email;

/// Lead pipeline status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Nurturing,
    Closed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Nurturing => "nurturing",
            Self::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "nurturing" => Ok(Self::Nurturing),
            "closed" => Ok(Self::Closed),
            other => Err(OpenHouseError::InvalidInput(format!("unknown lead status: {other}"))),
        }
    }
}

/// Lead record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    /// Normalized (lowercased) email; the unique identity of the lead.
    pub email: String,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub source: Option<String>,
    /// Display name of the assigned agent; `"Auto-assigned"` until matched.
    pub assigned_agent: String,
    pub budget: Option<f64>,
    pub property_type_preference: Option<String>,
    pub timeline: Option<String>,
    pub notes: Option<String>,
    pub last_contacted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Build a fresh lead from inbound fields. The email is normalized here
    /// so every caller gets canonical identity for free.
    pub fn create(fields: NewLead) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            email: normalize_email(&fields.email),
            phone: fields.phone,
            status: LeadStatus::New,
            source: fields.source,
            assigned_agent: AUTO_ASSIGNED_PLACEHOLDER.to_string(),
            budget: fields.budget,
            property_type_preference: fields.property_type_preference,
            timeline: fields.timeline,
            notes: fields.notes,
            last_contacted_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields accepted when creating a lead (form, webhook, or booking request).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub property_type_preference: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub assigned_agent: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub property_type_preference: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LeadUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.status.is_none()
            && self.source.is_none()
            && self.assigned_agent.is_none()
            && self.budget.is_none()
            && self.property_type_preference.is_none()
            && self.timeline.is_none()
            && self.notes.is_none()
    }
}

/// List filter for leads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadFilter {
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub assigned_agent: Option<String>,
    /// Case-insensitive substring match on name or email.
    #[serde(default)]
    pub search: Option<String>,
}

/// Per-status lead counts for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    pub nurturing: u64,
    pub closed: u64,
}
