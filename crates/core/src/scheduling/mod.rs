//! Availability matching: candidate slot generation, the calendar
//! availability check, and first-fit agent selection.

pub mod availability;
pub mod matcher;
pub mod ports;
pub mod slots;

pub use availability::AvailabilityService;
pub use matcher::{AgentMatcher, SlotMatch};
pub use slots::{TimeWindow, WorkSchedule};
