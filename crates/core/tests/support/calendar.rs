//! In-memory mock for the calendar provider port.
//!
//! Busy windows are scripted per calendar id; failure injection flips the
//! whole provider into an erroring state so fail-open/fail-closed policies
//! can be exercised.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openhouse_core::{CalendarPort, EventRef, EventRequest, UpcomingEvent};
use openhouse_domain::{OpenHouseError, Result};

#[derive(Default)]
pub struct MockCalendar {
    busy: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>)>>,
    reserved: Mutex<Vec<(String, EventRequest)>>,
    fail_availability: AtomicBool,
    fail_reservation: AtomicBool,
    counter: AtomicUsize,
}

impl MockCalendar {
    pub fn add_busy(&self, calendar_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.busy.lock().unwrap().push((calendar_id.to_string(), start, end));
    }

    pub fn set_fail_availability(&self, fail: bool) {
        self.fail_availability.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reservation(&self, fail: bool) {
        self.fail_reservation.store(fail, Ordering::SeqCst);
    }

    pub fn reservations(&self) -> Vec<(String, EventRequest)> {
        self.reserved.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarPort for MockCalendar {
    async fn is_slot_free(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool> {
        if self.fail_availability.load(Ordering::SeqCst) {
            return Err(OpenHouseError::ProviderUnavailable("calendar api down".into()));
        }
        let busy = self.busy.lock().unwrap();
        Ok(!busy
            .iter()
            .any(|(id, b_start, b_end)| id == calendar_id && start < *b_end && end > *b_start))
    }

    async fn reserve_event(&self, calendar_id: &str, event: &EventRequest) -> Result<EventRef> {
        if self.fail_reservation.load(Ordering::SeqCst) {
            return Err(OpenHouseError::ProviderUnavailable("event insert failed".into()));
        }
        self.reserved.lock().unwrap().push((calendar_id.to_string(), event.clone()));
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(EventRef {
            event_id: format!("evt-{n}"),
            link: Some(format!("https://calendar.example/evt-{n}")),
        })
    }

    async fn list_upcoming(&self, calendar_id: &str, max: usize) -> Result<Vec<UpcomingEvent>> {
        if self.fail_availability.load(Ordering::SeqCst) {
            return Err(OpenHouseError::ProviderUnavailable("calendar api down".into()));
        }
        let mut events: Vec<UpcomingEvent> = self
            .busy
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| id == calendar_id)
            .enumerate()
            .map(|(i, (_, start, end))| UpcomingEvent {
                id: format!("busy-{i}"),
                summary: None,
                start: *start,
                end: *end,
            })
            .collect();
        events.sort_by_key(|event| event.start);
        events.truncate(max);
        Ok(events)
    }
}
