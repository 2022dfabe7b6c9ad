//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::health::target::{Cadence, Endpoint, TargetGroup};

/// Root configuration for the guard.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Target groups to monitor, one health machine each.
    pub checkers: Vec<CheckerConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Diagnostics endpoint settings.
    pub admin: AdminConfig,
}

impl GuardConfig {
    /// Build the runtime target groups from the checker definitions.
    ///
    /// Assumes the configuration has been validated.
    pub fn target_groups(&self) -> Vec<TargetGroup> {
        self.checkers.iter().map(CheckerConfig::to_target_group).collect()
    }
}

/// A monitored target group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckerConfig {
    /// Checker identifier for logging/metrics.
    pub name: String,

    /// Equivalent endpoints raced against each other every cycle.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,

    /// Consecutive failures to go DOWN, consecutive successes to come back UP.
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    /// Command run on the DOWN to UP edge.
    #[serde(default)]
    pub post_up: String,

    /// Command run on the UP to DOWN edge.
    #[serde(default)]
    pub post_down: String,

    /// Optional forward proxy (e.g., "http://127.0.0.1:3128") for probes.
    #[serde(default)]
    pub proxy: String,

    /// Probe timeout while UP in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Probe timeout while DOWN in milliseconds (defaults to `timeout_ms`).
    #[serde(default)]
    pub timeout_down_ms: Option<u64>,

    /// Sleep durations between cycles.
    #[serde(default)]
    pub cadence: CadenceConfig,
}

fn default_threshold() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    5000
}

impl CheckerConfig {
    fn to_target_group(&self) -> TargetGroup {
        let timeout_up = Duration::from_millis(self.timeout_ms);
        let timeout_down = self
            .timeout_down_ms
            .map(Duration::from_millis)
            .unwrap_or(timeout_up);

        TargetGroup {
            name: self.name.clone(),
            endpoints: self.targets.iter().map(TargetConfig::to_endpoint).collect(),
            failure_threshold: self.threshold,
            on_down: non_blank(&self.post_down),
            on_up: non_blank(&self.post_up),
            probe_timeout_up: timeout_up,
            probe_timeout_down: timeout_down,
            cadence: self.cadence.to_cadence(),
            proxy: non_blank(&self.proxy).and_then(|p| p.parse().ok()),
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A single endpoint of a target group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Address dialed directly (e.g., "1.1.1.1" or "10.0.0.1:8080").
    #[serde(alias = "ip")]
    pub address: String,

    /// Virtual host sent as the Host header (defaults to `address`).
    #[serde(default)]
    pub host: String,
}

impl TargetConfig {
    fn to_endpoint(&self) -> Endpoint {
        let address = self.address.trim().to_string();
        let virtual_host = non_blank(&self.host).unwrap_or_else(|| address.clone());
        Endpoint::new(address, virtual_host)
    }
}

/// Poll cadence of one checker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Sleep after a healthy cycle while UP, in milliseconds.
    pub interval_ms: u64,

    /// Sleep after jitter, during recovery and after coming back UP.
    pub short_backoff_ms: u64,

    /// Sleep after a failed cycle while DOWN.
    pub medium_backoff_ms: u64,

    /// Sleep after going DOWN.
    pub long_backoff_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            short_backoff_ms: 2000,
            medium_backoff_ms: 10_000,
            long_backoff_ms: 30_000,
        }
    }
}

impl CadenceConfig {
    fn to_cadence(&self) -> Cadence {
        Cadence {
            interval: Duration::from_millis(self.interval_ms),
            short_backoff: Duration::from_millis(self.short_backoff_ms),
            medium_backoff: Duration::from_millis(self.medium_backoff_ms),
            long_backoff: Duration::from_millis(self.long_backoff_ms),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Diagnostics endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the read-only status endpoint.
    pub enabled: bool,

    /// Bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "127.0.0.1:6060".to_string(),
        }
    }
}
