//! Booking transaction orchestrator - core business logic
//!
//! Drives one booking request end-to-end: validation, property lookup, lead
//! dedupe, agent/slot selection, best-effort calendar reservation, and the
//! atomic commit of every record write. Notification fan-out runs strictly
//! after the commit, on a detached task.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use openhouse_domain::{
    normalize_email, AgentContact, AvailabilitySlot, BookingConfirmation, BookingRequest,
    BookingStatus, Lead, Meeting, NewMeeting, OpenHouseError, Property, PropertySummary, Result,
};
use tracing::{info, warn};

use super::ports::{AgentRepository, BookingStore, BookingUnit, LeadRepository, PropertyRepository};
use crate::notify::NotificationFanout;
use crate::scheduling::ports::{CalendarPort, EventRef, EventRequest};
use crate::scheduling::{AgentMatcher, AvailabilityService, SlotMatch, WorkSchedule};

/// Automated booking engine
pub struct BookingService {
    leads: Arc<dyn LeadRepository>,
    agents: Arc<dyn AgentRepository>,
    properties: Arc<dyn PropertyRepository>,
    store: Arc<dyn BookingStore>,
    calendar: Arc<dyn CalendarPort>,
    availability: Arc<AvailabilityService>,
    matcher: AgentMatcher,
    notifications: Arc<NotificationFanout>,
    max_slots_per_day: usize,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        leads: Arc<dyn LeadRepository>,
        agents: Arc<dyn AgentRepository>,
        properties: Arc<dyn PropertyRepository>,
        store: Arc<dyn BookingStore>,
        calendar: Arc<dyn CalendarPort>,
        availability: Arc<AvailabilityService>,
        notifications: Arc<NotificationFanout>,
        lookahead_days: u32,
        max_slots_per_day: usize,
    ) -> Self {
        let matcher = AgentMatcher::new(Arc::clone(&availability), lookahead_days);
        Self {
            leads,
            agents,
            properties,
            store,
            calendar,
            availability,
            matcher,
            notifications,
            max_slots_per_day,
        }
    }

    /// Process one booking request.
    ///
    /// Validation and lookups run before any write. Everything that is
    /// written lands in one atomic unit; any error before the commit leaves
    /// no partial state behind.
    pub async fn book(&self, request: BookingRequest) -> Result<BookingConfirmation> {
        request.validate()?;
        let now = Utc::now();
        if let Some(preferred) = request.preferred_time {
            if preferred <= now {
                return Err(OpenHouseError::InvalidInput(
                    "preferred time must be in the future".into(),
                ));
            }
        }

        let property = self
            .properties
            .find_by_id(&request.property_id)
            .await?
            .ok_or_else(|| {
                OpenHouseError::NotFound(format!("property {} not found", request.property_id))
            })?;

        let email = normalize_email(&request.email);
        if self.leads.find_by_email(&email).await?.is_some() {
            return Err(OpenHouseError::Conflict(format!(
                "a lead with email {email} already exists"
            )));
        }

        let mut lead = Lead::create(request.lead_fields());

        let candidates = self.agents.find_bookable().await?;
        if candidates.is_empty() {
            info!(lead = %lead.email, "no bookable agents, storing lead only");
            return self.commit_lead_only(lead, &property).await;
        }

        let Some(SlotMatch { agent, slot }) =
            self.matcher.select(&candidates, request.preferred_time, now).await
        else {
            info!(lead = %lead.email, "no open slot found, storing lead only");
            return self.commit_lead_only(lead, &property).await;
        };

        lead.assigned_agent = agent.name.clone();
        lead.updated_at = Utc::now();

        let mut meeting = Meeting::create(NewMeeting {
            lead_name: lead.name.clone(),
            property_address: property.address.clone(),
            date_time: slot.start,
            duration_min: Some(agent.meeting_duration_min),
            assigned_to: agent.name.clone(),
            notes: Some(format!("Auto-booked viewing for {}", property.address)),
        });

        if let Some(event) = self.reserve(&agent, &lead, &property, slot.start, slot.end).await {
            meeting.calendar_event_id = Some(event.event_id);
            meeting.calendar_event_link = event.link;
        }

        self.store
            .commit(BookingUnit {
                lead: lead.clone(),
                meeting: Some(meeting.clone()),
                booked_agent_id: Some(agent.id.clone()),
            })
            .await?;

        info!(
            lead = %lead.email,
            agent = %agent.email,
            start = %meeting.date_time,
            "viewing booked"
        );

        let contact = AgentContact::from(&agent);
        let summary = PropertySummary::from(&property);
        self.spawn_booking_notifications(
            lead.clone(),
            meeting.clone(),
            contact.clone(),
            summary.clone(),
            request.timezone.clone(),
        );

        Ok(BookingConfirmation {
            booking_status: BookingStatus::FullyBooked,
            calendar_link: meeting.calendar_event_link.clone(),
            lead,
            property: summary,
            meeting: Some(meeting),
            agent: Some(contact),
        })
    }

    /// Merged free slots of every bookable agent for one day, sorted by
    /// start time ascending. The `timezone` (default UTC) fixes the day
    /// boundaries the caller means by `date`.
    pub async fn availability_for(
        &self,
        property_id: &str,
        date: NaiveDate,
        timezone: Option<&str>,
    ) -> Result<Vec<AvailabilitySlot>> {
        self.properties.find_by_id(property_id).await?.ok_or_else(|| {
            OpenHouseError::NotFound(format!("property {property_id} not found"))
        })?;

        let tz: Tz = timezone.unwrap_or("UTC").parse().map_err(|_| {
            OpenHouseError::InvalidInput(format!(
                "unknown timezone: {}",
                timezone.unwrap_or_default()
            ))
        })?;
        let day_start = tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or_else(|| OpenHouseError::InvalidInput(format!("invalid date: {date}")))?
            .with_timezone(&Utc);
        let day_end = tz
            .from_local_datetime(&(date + Duration::days(1)).and_time(NaiveTime::MIN))
            .earliest()
            .ok_or_else(|| OpenHouseError::InvalidInput(format!("invalid date: {date}")))?
            .with_timezone(&Utc);

        let mut merged = Vec::new();
        for agent in self.agents.find_bookable().await? {
            let schedule = match WorkSchedule::for_agent(&agent) {
                Ok(schedule) => schedule,
                Err(err) => {
                    warn!(agent = %agent.email, error = %err, "skipping agent with invalid schedule");
                    continue;
                }
            };
            let contact = AgentContact::from(&agent);
            let mut per_agent = 0usize;
            // An agent's local working day can straddle the caller's day
            // boundaries, so scan the adjacent dates too.
            for offset in -1..=1i64 {
                let local_date = date + Duration::days(offset);
                for slot in
                    self.availability.free_slots_for_day(&agent, &schedule, local_date, None).await
                {
                    if slot.start >= day_start && slot.start < day_end {
                        merged.push(AvailabilitySlot {
                            start: slot.start,
                            end: slot.end,
                            agent: contact.clone(),
                        });
                        per_agent += 1;
                        if per_agent >= self.max_slots_per_day {
                            break;
                        }
                    }
                }
                if per_agent >= self.max_slots_per_day {
                    break;
                }
            }
        }
        merged.sort_by_key(|slot| slot.start);
        Ok(merged)
    }

    async fn commit_lead_only(&self, lead: Lead, property: &Property) -> Result<BookingConfirmation> {
        self.store
            .commit(BookingUnit { lead: lead.clone(), meeting: None, booked_agent_id: None })
            .await?;

        let notifications = Arc::clone(&self.notifications);
        let captured = lead.clone();
        tokio::spawn(async move {
            notifications.lead_captured(&captured).await;
        });

        Ok(BookingConfirmation {
            booking_status: BookingStatus::LeadOnly,
            lead,
            property: PropertySummary::from(property),
            meeting: None,
            agent: None,
            calendar_link: None,
        })
    }

    /// Best-effort external reservation. A provider failure here must not
    /// lose a slot that already passed the double-booking check, so errors
    /// are logged and the meeting proceeds without an event reference.
    async fn reserve(
        &self,
        agent: &openhouse_domain::Agent,
        lead: &Lead,
        property: &Property,
        start: chrono::DateTime<Utc>,
        end: chrono::DateTime<Utc>,
    ) -> Option<EventRef> {
        let calendar_id = agent.calendar_id.as_deref()?;
        let event = EventRequest {
            summary: format!("Property viewing: {}", property.address),
            description: Some(format!("Viewing with {} ({})", lead.name, lead.email)),
            start,
            end,
            attendee_emails: vec![lead.email.clone(), agent.email.clone()],
        };

        match self.calendar.reserve_event(calendar_id, &event).await {
            Ok(event_ref) => Some(event_ref),
            Err(err) => {
                warn!(
                    agent = %agent.email,
                    error = %err,
                    "calendar reservation failed, booking continues without an event"
                );
                None
            }
        }
    }

    fn spawn_booking_notifications(
        &self,
        lead: Lead,
        meeting: Meeting,
        agent: AgentContact,
        property: PropertySummary,
        timezone: Option<String>,
    ) {
        let notifications = Arc::clone(&self.notifications);
        tokio::spawn(async move {
            notifications
                .booking_confirmed(&lead, &meeting, &agent, &property, timezone.as_deref())
                .await;
        });
    }
}
