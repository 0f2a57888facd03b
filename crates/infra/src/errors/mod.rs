//! Infrastructure error conversion layer.

mod conversions;

pub use conversions::InfraError;
