//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisor
//!     → machine.rs (one loop per target group)
//!     → race.rs (probe every endpoint concurrently, first success wins)
//!     → probe.rs (HEAD request, bounded by timeout)
//!
//! Race result
//!     → state.rs (hysteresis: Up ←→ Down)
//!     → status.rs (atomic snapshot for readers)
//!     → on edge: action runner
//! ```
//!
//! # Design Decisions
//! - State transitions require `threshold` consecutive observations both ways
//! - Health state is per target group, owned by its machine alone
//! - Probe failures are data, never errors

pub mod machine;
pub mod probe;
pub mod race;
pub mod state;
pub mod status;
pub mod target;

pub use machine::{Edge, HealthMachine};
pub use probe::{HttpProbe, Probe, ProbeResult};
pub use race::Racer;
pub use state::{HealthState, Status, Verdict};
pub use status::{StatusHandle, StatusRegistry, StatusSnapshot};
pub use target::{Cadence, Endpoint, TargetGroup};
