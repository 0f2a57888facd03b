//! Record store port interfaces
//!
//! These traits define the boundaries between core business logic and the
//! persistence layer. The store enforces the durable unique-email constraint
//! on leads; implementations surface it as `Conflict`, never as a generic
//! failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openhouse_domain::{
    Agent, Lead, LeadFilter, LeadStats, Meeting, MeetingFilter, Page, Property, PropertyFilter,
    Result, SortKey, SortOrder,
};

/// Trait for persisting and querying leads
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Insert a new lead. A duplicate email yields `Conflict`.
    async fn insert(&self, lead: &Lead) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>>;

    /// Lookup by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Lead>>;

    async fn list(
        &self,
        filter: &LeadFilter,
        sort: SortKey,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Lead>>;

    async fn count(&self, filter: &LeadFilter) -> Result<u64>;

    /// Per-status counts.
    async fn stats(&self) -> Result<LeadStats>;

    /// Full-row update keyed by id. `NotFound` when the lead is gone.
    async fn update(&self, lead: &Lead) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Trait for persisting and querying agents
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Insert a new agent. A duplicate email yields `Conflict`.
    async fn insert(&self, agent: &Agent) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Agent>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>>;

    /// Lookup by display name (meetings snapshot the agent name).
    async fn find_by_name(&self, name: &str) -> Result<Option<Agent>>;

    async fn list(&self, only_active: bool, page: Page) -> Result<Vec<Agent>>;

    /// Agents eligible for automated booking: active and calendar-linked.
    /// Iteration order is the store's return order; selection deliberately
    /// applies no further ranking.
    async fn find_bookable(&self) -> Result<Vec<Agent>>;

    async fn update(&self, agent: &Agent) -> Result<()>;

    /// Bump the completed-meetings counter for the named agent.
    async fn record_completion(&self, agent_name: &str) -> Result<()>;
}

/// Trait for persisting and querying meetings
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn insert(&self, meeting: &Meeting) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Meeting>>;

    async fn list(&self, filter: &MeetingFilter, page: Page) -> Result<Vec<Meeting>>;

    /// Scheduled meetings for one assignee whose start falls within
    /// `[from, to]`.
    async fn scheduled_for_assignee(
        &self,
        assigned_to: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Meeting>>;

    async fn update(&self, meeting: &Meeting) -> Result<()>;
}

/// Trait for persisting and querying properties
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn insert(&self, property: &Property) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>>;

    async fn list(&self, filter: &PropertyFilter, page: Page) -> Result<Vec<Property>>;

    async fn count(&self, filter: &PropertyFilter) -> Result<u64>;

    async fn update(&self, property: &Property) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// The writes of one booking attempt, committed together or not at all.
#[derive(Debug, Clone)]
pub struct BookingUnit {
    pub lead: Lead,
    pub meeting: Option<Meeting>,
    /// When set, the agent whose total-meetings counter is incremented as
    /// part of the same transaction.
    pub booked_agent_id: Option<String>,
}

/// Atomic multi-entity commit for the booking flow.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Commit the unit as a single transaction. Either every row lands or
    /// none does; a duplicate lead email aborts with `Conflict`.
    async fn commit(&self, unit: BookingUnit) -> Result<()>;
}
