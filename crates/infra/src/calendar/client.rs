//! Google Calendar client implementing the core calendar port.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use openhouse_core::{CalendarPort, EventRef, EventRequest, UpcomingEvent};
use openhouse_domain::{CalendarConfig, OpenHouseError, Result};
use reqwest::Client;
use tracing::debug;

use super::auth::TokenManager;
use super::types::{
    EventAttendee, EventInsert, EventResource, EventTime, EventsListResponse, FreeBusyItem,
    FreeBusyRequest, FreeBusyResponse,
};

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar provider
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http: Client,
    auth: TokenManager,
    api_base: String,
}

impl GoogleCalendarClient {
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        let http = Client::new();
        let auth = TokenManager::from_config(config, http.clone())?;
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| GOOGLE_CALENDAR_API_BASE.to_string());
        Ok(Self { http, auth, api_base })
    }

    fn rfc3339(when: DateTime<Utc>) -> String {
        when.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let detail = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
        Err(OpenHouseError::ProviderUnavailable(format!("{what} failed ({status}): {detail}")))
    }
}

#[async_trait]
impl CalendarPort for GoogleCalendarClient {
    async fn is_slot_free(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool> {
        let token = self.auth.access_token().await?;
        let request = FreeBusyRequest {
            time_min: Self::rfc3339(start),
            time_max: Self::rfc3339(end),
            items: vec![FreeBusyItem { id: calendar_id.to_string() }],
        };

        let response = self
            .http
            .post(format!("{}/freeBusy", self.api_base))
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                OpenHouseError::ProviderUnavailable(format!("free/busy request failed: {err}"))
            })?;
        let response = Self::check(response, "free/busy query").await?;

        let free_busy: FreeBusyResponse = response.json().await.map_err(|err| {
            OpenHouseError::ProviderUnavailable(format!(
                "failed to parse free/busy response: {err}"
            ))
        })?;

        let busy = free_busy
            .calendars
            .get(calendar_id)
            .map(|calendar| calendar.busy.len())
            .unwrap_or(0);
        debug!(calendar_id, %start, %end, busy, "free/busy answered");
        Ok(busy == 0)
    }

    async fn reserve_event(&self, calendar_id: &str, event: &EventRequest) -> Result<EventRef> {
        let token = self.auth.access_token().await?;
        let body = EventInsert {
            summary: event.summary.clone(),
            description: event.description.clone(),
            start: EventTime { date_time: Some(Self::rfc3339(event.start)), date: None },
            end: EventTime { date_time: Some(Self::rfc3339(event.end)), date: None },
            attendees: event
                .attendee_emails
                .iter()
                .map(|email| EventAttendee { email: email.clone() })
                .collect(),
        };

        let response = self
            .http
            .post(format!("{}/calendars/{}/events", self.api_base, calendar_id))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                OpenHouseError::ProviderUnavailable(format!("event insert failed: {err}"))
            })?;
        let response = Self::check(response, "event insert").await?;

        let created: EventResource = response.json().await.map_err(|err| {
            OpenHouseError::ProviderUnavailable(format!("failed to parse event response: {err}"))
        })?;

        Ok(EventRef { event_id: created.id, link: created.html_link })
    }

    async fn list_upcoming(&self, calendar_id: &str, max: usize) -> Result<Vec<UpcomingEvent>> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .get(format!("{}/calendars/{}/events", self.api_base, calendar_id))
            .bearer_auth(&token)
            .query(&[
                ("timeMin", Self::rfc3339(Utc::now())),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("maxResults", max.to_string()),
            ])
            .send()
            .await
            .map_err(|err| {
                OpenHouseError::ProviderUnavailable(format!("events list failed: {err}"))
            })?;
        let response = Self::check(response, "events list").await?;

        let listed: EventsListResponse = response.json().await.map_err(|err| {
            OpenHouseError::ProviderUnavailable(format!("failed to parse events list: {err}"))
        })?;

        // All-day events carry a date instead of a dateTime and are skipped.
        let events = listed
            .items
            .into_iter()
            .filter_map(|item| {
                let start = parse_event_time(item.start.as_ref())?;
                let end = parse_event_time(item.end.as_ref())?;
                Some(UpcomingEvent { id: item.id, summary: item.summary, start, end })
            })
            .collect();
        Ok(events)
    }
}

fn parse_event_time(time: Option<&EventTime>) -> Option<DateTime<Utc>> {
    let raw = time?.date_time.as_deref()?;
    DateTime::parse_from_rfc3339(raw).ok().map(|parsed| parsed.with_timezone(&Utc))
}

/// Stand-in used when calendar integration is switched off. Every call
/// errors as provider-unavailable, which the booking flow's availability
/// policy and best-effort reservation already know how to absorb.
pub struct DisabledCalendar;

#[async_trait]
impl CalendarPort for DisabledCalendar {
    async fn is_slot_free(
        &self,
        _calendar_id: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<bool> {
        Err(OpenHouseError::ProviderUnavailable("calendar integration disabled".into()))
    }

    async fn reserve_event(&self, _calendar_id: &str, _event: &EventRequest) -> Result<EventRef> {
        Err(OpenHouseError::ProviderUnavailable("calendar integration disabled".into()))
    }

    async fn list_upcoming(&self, _calendar_id: &str, _max: usize) -> Result<Vec<UpcomingEvent>> {
        Err(OpenHouseError::ProviderUnavailable("calendar integration disabled".into()))
    }
}
