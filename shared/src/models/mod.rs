//! Domain models for the Rice Production Management System

mod accuracy;
mod activity;
mod forecast;
mod production;
mod quality;
mod season;

pub use accuracy::*;
pub use activity::*;
pub use forecast::*;
pub use production::*;
pub use quality::*;
pub use season::*;
