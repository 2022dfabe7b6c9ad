//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging/metrics → startup.rs binds listeners,
//!     then supervisor.rs launches machines
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → machines and diagnostics server exit → join
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: a bad config is fatal before any machine starts
//! - Shutdown has timeout: forced exit after deadline

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::Shutdown;
pub use startup::{start, Running};
pub use supervisor::Supervisor;
