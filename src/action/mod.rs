//! Transition actions.
//!
//! # Data Flow
//! ```text
//! HealthMachine edge (Up → Down / Down → Up)
//!     → ActionRunner::run(command)
//!     → command.rs (split, spawn, wait, log output)
//!     → ActionOutcome (logged, never fed back into health)
//! ```
//!
//! # Design Decisions
//! - Commands are split on whitespace only; no quoting or escaping
//! - The machine waits for the command before its next cycle
//! - Failures are warnings, never health-check failures

pub mod command;

use std::future::Future;

pub use command::CommandRunner;

/// What happened when an action was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Blank command; nothing was spawned.
    Skipped,
    /// Exited with status 0.
    Succeeded,
    /// Could not be spawned, or exited non-zero.
    Failed,
}

impl ActionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionOutcome::Skipped => "skipped",
            ActionOutcome::Succeeded => "succeeded",
            ActionOutcome::Failed => "failed",
        }
    }
}

/// Executes transition commands.
pub trait ActionRunner: Send + Sync + 'static {
    fn run(&self, command: &str) -> impl Future<Output = ActionOutcome> + Send;
}
