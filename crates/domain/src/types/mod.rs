//! Domain types and models

pub mod agent;
pub mod booking;
pub mod config;
pub mod lead;
pub mod meeting;
pub mod property;
pub mod query;

pub use agent::{Agent, AgentContact, AgentUpdate, NewAgent, WorkingHours};
pub use booking::{AvailabilitySlot, BookingConfirmation, BookingRequest, BookingStatus, Slot};
pub use config::{
    BookingConfig, CalendarConfig, Config, DatabaseConfig, EmailConfig, ServerConfig, SmsConfig,
};
pub use lead::{Lead, LeadFilter, LeadStats, LeadStatus, LeadUpdate, NewLead};
pub use meeting::{Meeting, MeetingFilter, MeetingStatus, MeetingUpdate, NewMeeting};
pub use property::{NewProperty, Property, PropertyFilter, PropertyStatus, PropertySummary, PropertyUpdate};
pub use query::{Page, SortKey, SortOrder};
