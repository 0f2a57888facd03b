//! Google Calendar integration.
//!
//! The client implements the core `CalendarPort`: free/busy queries, event
//! creation, and upcoming-event listing, authenticated with a cached
//! refresh-token grant.

mod auth;
mod client;
mod types;

pub use auth::TokenManager;
pub use client::{DisabledCalendar, GoogleCalendarClient};
