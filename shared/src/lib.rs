//! Shared types and forecasting core for the Rice Production Management System
//!
//! This crate contains types shared between the backend, browser clients (via WASM),
//! and the seasonal yield forecasting engine that turns historical harvest
//! records into per-season yield predictions.

pub mod forecasting;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
