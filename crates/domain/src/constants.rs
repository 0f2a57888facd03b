//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Agent scheduling defaults and bounds (minutes)
pub const DEFAULT_MEETING_DURATION_MIN: i64 = 60;
pub const MIN_MEETING_DURATION_MIN: i64 = 15;
pub const MAX_MEETING_DURATION_MIN: i64 = 240;
pub const DEFAULT_BUFFER_MIN: i64 = 15;
pub const MIN_BUFFER_MIN: i64 = 0;
pub const MAX_BUFFER_MIN: i64 = 60;

// Forward scan window when searching for the next open slot
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 7;

// Assigned-agent placeholder before an agent is matched
pub const AUTO_ASSIGNED_PLACEHOLDER: &str = "Auto-assigned";

// Manual scheduling overlap pre-check (minutes each side of the new slot)
pub const MANUAL_OVERLAP_WINDOW_MIN: i64 = 60;

// List pagination
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
pub const MAX_PAGE_LIMIT: u32 = 200;

// Realtime channels
pub const ADMIN_CHANNEL: &str = "admin";
