//! In-memory record store implementing every repository port plus the
//! atomic booking commit.
//!
//! One struct backs all the ports so the booking store and the individual
//! repositories observe the same state, exactly like the SQLite
//! implementation sharing one database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openhouse_core::booking::ports::{
    AgentRepository, BookingStore, BookingUnit, LeadRepository, MeetingRepository,
    PropertyRepository,
};
use openhouse_domain::{
    Agent, Lead, LeadFilter, LeadStats, LeadStatus, Meeting, MeetingFilter, MeetingStatus,
    OpenHouseError, Page, Property, PropertyFilter, Result, SortKey, SortOrder,
};

#[derive(Default)]
pub struct InMemoryStore {
    pub leads: Arc<Mutex<Vec<Lead>>>,
    pub agents: Arc<Mutex<Vec<Agent>>>,
    pub meetings: Arc<Mutex<Vec<Meeting>>>,
    pub properties: Arc<Mutex<Vec<Property>>>,
    pub fail_commit: AtomicBool,
}

impl InMemoryStore {
    pub fn set_fail_commit(&self, fail: bool) {
        self.fail_commit.store(fail, Ordering::SeqCst);
    }

    fn lead_matches(lead: &Lead, filter: &LeadFilter) -> bool {
        if let Some(status) = filter.status {
            if lead.status != status {
                return false;
            }
        }
        if let Some(assigned) = &filter.assigned_agent {
            if &lead.assigned_agent != assigned {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_ascii_lowercase();
            if !lead.name.to_ascii_lowercase().contains(&needle)
                && !lead.email.contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl LeadRepository for InMemoryStore {
    async fn insert(&self, lead: &Lead) -> Result<()> {
        let mut leads = self.leads.lock().unwrap();
        if leads.iter().any(|existing| existing.email == lead.email) {
            return Err(OpenHouseError::Conflict(format!(
                "lead email already exists: {}",
                lead.email
            )));
        }
        leads.push(lead.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>> {
        Ok(self.leads.lock().unwrap().iter().find(|lead| lead.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Lead>> {
        Ok(self.leads.lock().unwrap().iter().find(|lead| lead.email == email).cloned())
    }

    async fn list(
        &self,
        filter: &LeadFilter,
        sort: SortKey,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Lead>> {
        let mut rows: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|lead| Self::lead_matches(lead, filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let ordering = match sort {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortKey::Name => a.name.cmp(&b.name),
            };
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &LeadFilter) -> Result<u64> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|lead| Self::lead_matches(lead, filter))
            .count() as u64)
    }

    async fn stats(&self) -> Result<LeadStats> {
        let leads = self.leads.lock().unwrap();
        let count = |status: LeadStatus| {
            leads.iter().filter(|lead| lead.status == status).count() as u64
        };
        Ok(LeadStats {
            total: leads.len() as u64,
            new: count(LeadStatus::New),
            contacted: count(LeadStatus::Contacted),
            nurturing: count(LeadStatus::Nurturing),
            closed: count(LeadStatus::Closed),
        })
    }

    async fn update(&self, lead: &Lead) -> Result<()> {
        let mut leads = self.leads.lock().unwrap();
        match leads.iter_mut().find(|existing| existing.id == lead.id) {
            Some(existing) => {
                *existing = lead.clone();
                Ok(())
            }
            None => Err(OpenHouseError::NotFound(format!("lead {} not found", lead.id))),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut leads = self.leads.lock().unwrap();
        let before = leads.len();
        leads.retain(|lead| lead.id != id);
        if leads.len() == before {
            return Err(OpenHouseError::NotFound(format!("lead {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl AgentRepository for InMemoryStore {
    async fn insert(&self, agent: &Agent) -> Result<()> {
        let mut agents = self.agents.lock().unwrap();
        if agents.iter().any(|existing| existing.email == agent.email) {
            return Err(OpenHouseError::Conflict(format!(
                "agent email already exists: {}",
                agent.email
            )));
        }
        agents.push(agent.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Agent>> {
        Ok(self.agents.lock().unwrap().iter().find(|agent| agent.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>> {
        Ok(self.agents.lock().unwrap().iter().find(|agent| agent.email == email).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Agent>> {
        Ok(self.agents.lock().unwrap().iter().find(|agent| agent.name == name).cloned())
    }

    async fn list(&self, only_active: bool, page: Page) -> Result<Vec<Agent>> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|agent| !only_active || agent.is_active)
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_bookable(&self) -> Result<Vec<Agent>> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|agent| agent.is_bookable())
            .cloned()
            .collect())
    }

    async fn update(&self, agent: &Agent) -> Result<()> {
        let mut agents = self.agents.lock().unwrap();
        match agents.iter_mut().find(|existing| existing.id == agent.id) {
            Some(existing) => {
                *existing = agent.clone();
                Ok(())
            }
            None => Err(OpenHouseError::NotFound(format!("agent {} not found", agent.id))),
        }
    }

    async fn record_completion(&self, agent_name: &str) -> Result<()> {
        let mut agents = self.agents.lock().unwrap();
        match agents.iter_mut().find(|agent| agent.name == agent_name) {
            Some(agent) => {
                agent.completed_meetings += 1;
                agent.updated_at = Utc::now();
                Ok(())
            }
            None => Err(OpenHouseError::NotFound(format!("agent {agent_name} not found"))),
        }
    }
}

#[async_trait]
impl MeetingRepository for InMemoryStore {
    async fn insert(&self, meeting: &Meeting) -> Result<()> {
        self.meetings.lock().unwrap().push(meeting.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Meeting>> {
        Ok(self.meetings.lock().unwrap().iter().find(|meeting| meeting.id == id).cloned())
    }

    async fn list(&self, filter: &MeetingFilter, page: Page) -> Result<Vec<Meeting>> {
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .filter(|meeting| {
                filter.assigned_to.as_ref().map_or(true, |a| &meeting.assigned_to == a)
                    && filter.status.map_or(true, |s| meeting.status == s)
                    && filter.from.map_or(true, |from| meeting.date_time >= from)
                    && filter.to.map_or(true, |to| meeting.date_time <= to)
            })
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn scheduled_for_assignee(
        &self,
        assigned_to: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Meeting>> {
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .filter(|meeting| {
                meeting.assigned_to == assigned_to
                    && meeting.status == MeetingStatus::Scheduled
                    && meeting.date_time >= from
                    && meeting.date_time <= to
            })
            .cloned()
            .collect())
    }

    async fn update(&self, meeting: &Meeting) -> Result<()> {
        let mut meetings = self.meetings.lock().unwrap();
        match meetings.iter_mut().find(|existing| existing.id == meeting.id) {
            Some(existing) => {
                *existing = meeting.clone();
                Ok(())
            }
            None => Err(OpenHouseError::NotFound(format!("meeting {} not found", meeting.id))),
        }
    }
}

#[async_trait]
impl PropertyRepository for InMemoryStore {
    async fn insert(&self, property: &Property) -> Result<()> {
        self.properties.lock().unwrap().push(property.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .find(|property| property.id == id)
            .cloned())
    }

    async fn list(&self, filter: &PropertyFilter, page: Page) -> Result<Vec<Property>> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|property| property_matches(property, filter))
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PropertyFilter) -> Result<u64> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|property| property_matches(property, filter))
            .count() as u64)
    }

    async fn update(&self, property: &Property) -> Result<()> {
        let mut properties = self.properties.lock().unwrap();
        match properties.iter_mut().find(|existing| existing.id == property.id) {
            Some(existing) => {
                *existing = property.clone();
                Ok(())
            }
            None => {
                Err(OpenHouseError::NotFound(format!("property {} not found", property.id)))
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut properties = self.properties.lock().unwrap();
        let before = properties.len();
        properties.retain(|property| property.id != id);
        if properties.len() == before {
            return Err(OpenHouseError::NotFound(format!("property {id} not found")));
        }
        Ok(())
    }
}

fn property_matches(property: &Property, filter: &PropertyFilter) -> bool {
    filter.status.map_or(true, |s| property.status == s)
        && filter.property_type.as_ref().map_or(true, |t| &property.property_type == t)
        && filter.min_price.map_or(true, |min| property.price >= min)
        && filter.max_price.map_or(true, |max| property.price <= max)
        && filter.min_bedrooms.map_or(true, |min| property.bedrooms >= min)
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn commit(&self, unit: BookingUnit) -> Result<()> {
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(OpenHouseError::Database("commit failed".into()));
        }

        // Validate everything up front so a failure writes nothing, mirroring
        // the transactional store.
        {
            let leads = self.leads.lock().unwrap();
            if leads.iter().any(|existing| existing.email == unit.lead.email) {
                return Err(OpenHouseError::Conflict(format!(
                    "lead email already exists: {}",
                    unit.lead.email
                )));
            }
        }
        if let Some(agent_id) = &unit.booked_agent_id {
            let agents = self.agents.lock().unwrap();
            if !agents.iter().any(|agent| &agent.id == agent_id) {
                return Err(OpenHouseError::NotFound(format!("agent {agent_id} not found")));
            }
        }

        self.leads.lock().unwrap().push(unit.lead);
        if let Some(meeting) = unit.meeting {
            self.meetings.lock().unwrap().push(meeting);
        }
        if let Some(agent_id) = unit.booked_agent_id {
            let mut agents = self.agents.lock().unwrap();
            if let Some(agent) = agents.iter_mut().find(|agent| agent.id == agent_id) {
                agent.total_meetings += 1;
                agent.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}
