//! SQLite persistence layer.

pub mod agent_repository;
pub mod booking_store;
pub mod lead_repository;
pub mod manager;
pub mod meeting_repository;
pub mod property_repository;

use chrono::{DateTime, Utc};

pub use agent_repository::SqliteAgentRepository;
pub use booking_store::SqliteBookingStore;
pub use lead_repository::SqliteLeadRepository;
pub use manager::DbManager;
pub use meeting_repository::SqliteMeetingRepository;
pub use property_repository::SqlitePropertyRepository;

/// Epoch seconds to `DateTime<Utc>`; a corrupt timestamp degrades to the
/// epoch rather than poisoning the whole row.
pub(crate) fn datetime_from_ts(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

/// Column conversion failure, reported through rusqlite's own error type so
/// the shared conversion layer handles it uniformly.
pub(crate) fn bad_column(index: usize, detail: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        detail.into(),
    )
}
