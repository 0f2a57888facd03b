//! Domain-level utility helpers

pub mod contact;
