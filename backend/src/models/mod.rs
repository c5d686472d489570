//! Domain models for the Rice Production Management System
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
