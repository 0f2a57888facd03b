//! Shared test support: in-memory ports and fixture builders.
//!
//! Each integration test binary compiles this module separately and uses a
//! subset of it.
#![allow(dead_code)]

pub mod calendar;
pub mod notify;
pub mod repositories;

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use openhouse_domain::{
    Agent, BookingRequest, NewAgent, NewProperty, Property, PropertyStatus, WorkingHours,
};
use openhouse_core::{AvailabilityService, BookingService, NotificationFanout};

use calendar::MockCalendar;
use notify::RecordingChannels;
use repositories::InMemoryStore;

/// Everything a booking-flow test needs, wired the way the application
/// context wires production services.
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub calendar: Arc<MockCalendar>,
    pub channels: RecordingChannels,
    pub booking: BookingService,
}

pub fn harness() -> TestHarness {
    harness_with_policy(true)
}

pub fn harness_with_policy(fail_open: bool) -> TestHarness {
    let store = Arc::new(InMemoryStore::default());
    let calendar = Arc::new(MockCalendar::default());
    let channels = RecordingChannels::default();
    let fanout = Arc::new(NotificationFanout::new(
        channels.email.clone(),
        channels.sms.clone(),
        channels.realtime.clone(),
    ));
    let availability = Arc::new(AvailabilityService::new(calendar.clone(), fail_open));

    let booking = BookingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        calendar.clone(),
        availability,
        fanout,
        7,
        10,
    );

    TestHarness { store, calendar, channels, booking }
}

pub fn agent(name: &str, email: &str) -> Agent {
    NewAgent {
        name: name.into(),
        email: email.into(),
        phone: None,
        calendar_id: Some(email.into()),
        working_days: vec![
            "monday".into(),
            "tuesday".into(),
            "wednesday".into(),
            "thursday".into(),
            "friday".into(),
        ],
        working_hours: WorkingHours {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        },
        meeting_duration_min: 60,
        buffer_min: 15,
        timezone: "UTC".into(),
        is_active: true,
    }
    .into_agent()
}

/// An agent available every day of the week, so tests do not depend on the
/// weekday they run on.
pub fn all_week_agent(name: &str, email: &str) -> Agent {
    let mut agent = agent(name, email);
    agent.working_days = vec![
        "monday".into(),
        "tuesday".into(),
        "wednesday".into(),
        "thursday".into(),
        "friday".into(),
        "saturday".into(),
        "sunday".into(),
    ];
    agent
}

pub fn property(address: &str) -> Property {
    NewProperty {
        address: address.into(),
        price: 450_000.0,
        bedrooms: 3,
        bathrooms: 2.0,
        sqft: 1600,
        media: vec![],
        property_type: "house".into(),
        status: PropertyStatus::Available,
        year_built: Some(2001),
        features: vec![],
    }
    .into_property()
}

pub fn booking_request(name: &str, email: &str, property_id: &str) -> BookingRequest {
    BookingRequest {
        name: name.into(),
        email: email.into(),
        phone: Some("+15550100".into()),
        source: None,
        budget: Some(500_000.0),
        property_type_preference: None,
        timeline: None,
        notes: None,
        property_id: property_id.into(),
        preferred_time: None,
        timezone: None,
    }
}

/// Seed a property and return its id.
pub fn seed_property(store: &InMemoryStore, address: &str) -> String {
    let listing = property(address);
    let id = listing.id.clone();
    store.properties.lock().unwrap().push(listing);
    id
}

pub fn seed_agent(store: &InMemoryStore, agent: Agent) {
    store.agents.lock().unwrap().push(agent);
}

/// First free moment tomorrow at the given hour, UTC. Always in the future.
pub fn tomorrow_at(hour: u32) -> chrono::DateTime<Utc> {
    use chrono::{Duration, TimeZone};

    let date = (Utc::now() + Duration::days(1)).date_naive();
    Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
}
