//! # OpenHouse Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The availability-matching and booking engine
//! - CRUD services for leads, properties, meetings and agents
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `openhouse-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod booking;
pub mod crm;
pub mod notify;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use booking::ports::{
    AgentRepository, BookingStore, BookingUnit, LeadRepository, MeetingRepository,
    PropertyRepository,
};
pub use booking::BookingService;
pub use crm::{AgentService, LeadService, MeetingService, PropertyService, ScheduleOutcome};
pub use notify::ports::{EmailMessage, EmailPort, RealtimeEvent, RealtimePort, SmsPort};
pub use notify::NotificationFanout;
pub use scheduling::ports::{CalendarPort, EventRef, EventRequest, UpcomingEvent};
pub use scheduling::{AgentMatcher, AvailabilityService, SlotMatch, TimeWindow, WorkSchedule};
