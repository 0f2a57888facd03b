//! Google Calendar API wire types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/* ------------------------------ free/busy ------------------------------- */

#[derive(Debug, Serialize)]
pub struct FreeBusyRequest {
    #[serde(rename = "timeMin")]
    pub time_min: String,
    #[serde(rename = "timeMax")]
    pub time_max: String,
    pub items: Vec<FreeBusyItem>,
}

#[derive(Debug, Serialize)]
pub struct FreeBusyItem {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FreeBusyCalendar {
    #[serde(default)]
    pub busy: Vec<BusyPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct BusyPeriod {
    pub start: String,
    pub end: String,
}

/* ------------------------------- events --------------------------------- */

#[derive(Debug, Serialize)]
pub struct EventInsert {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<EventAttendee>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventAttendee {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct EventResource {
    pub id: String,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
    pub summary: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
pub struct EventsListResponse {
    #[serde(default)]
    pub items: Vec<EventResource>,
}

/* -------------------------------- oauth --------------------------------- */

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}
