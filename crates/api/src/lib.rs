//! # OpenHouse API
//!
//! The HTTP surface of the booking backend: an axum router over the core
//! services, plus the application context that wires every service together
//! at startup.

pub mod context;
pub mod error;
pub mod routes;

pub use context::AppContext;
pub use error::ApiError;
