//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → target_groups() → one TargetGroup per health machine
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a target group never changes under its machine
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AdminConfig, CheckerConfig, GuardConfig, LogFormat, ObservabilityConfig};
