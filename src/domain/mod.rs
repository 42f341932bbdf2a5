//! Core domain types and logic.

pub mod coerce;
pub mod error;
pub mod impact;
pub mod inputs;
pub mod projection;
pub mod record;
pub mod scenario;
pub mod summary;
pub mod term;
pub mod validation;
