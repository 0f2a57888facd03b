//! CRUD services around the booking engine.

pub mod agents;
pub mod leads;
pub mod meetings;
pub mod properties;

pub use agents::AgentService;
pub use leads::LeadService;
pub use meetings::{MeetingService, ScheduleOutcome};
pub use properties::PropertyService;
