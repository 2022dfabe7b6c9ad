//! Network liveness guard library.
//!
//! Probes groups of equivalent endpoints, applies hysteresis, and runs
//! external commands when a group goes down or comes back up.

pub mod action;
pub mod admin;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::GuardConfig;
pub use health::{HealthMachine, TargetGroup};
pub use lifecycle::{Shutdown, Supervisor};
