//! Business logic services for the Rice Production Management System

pub mod activity;
pub mod forecast;
pub mod production;

pub use activity::ActivityLog;
