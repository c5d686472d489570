//! HTTP handlers for the Rice Production Management System

pub mod activity;
pub mod forecast;
pub mod health;

pub use activity::{list_activity_logs, record_activity};
pub use forecast::{get_current_summary, get_data_quality, get_forecast, validate_forecast};
pub use health::health_check;
