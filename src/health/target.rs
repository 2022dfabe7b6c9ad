//! Monitored target definitions.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::health::state::Verdict;

/// A single probe destination.
///
/// `address` is dialed as-is; `virtual_host` travels in the Host header so a
/// fixed IP can be checked for a specific virtual host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub address: String,
    pub virtual_host: String,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, virtual_host: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            virtual_host: virtual_host.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address == self.virtual_host {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} ({})", self.address, self.virtual_host)
        }
    }
}

/// Sleep durations between poll cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    /// After a healthy cycle while UP.
    pub interval: Duration,
    /// After jitter, during recovery, and right after coming back UP.
    pub short_backoff: Duration,
    /// After a failed cycle while DOWN.
    pub medium_backoff: Duration,
    /// Right after going DOWN.
    pub long_backoff: Duration,
}

impl Cadence {
    /// The same delay after every cycle.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            interval: delay,
            short_backoff: delay,
            medium_backoff: delay,
            long_backoff: delay,
        }
    }

    /// How long to sleep after a cycle that produced `verdict`.
    pub fn delay_for(&self, verdict: Verdict) -> Duration {
        match verdict {
            Verdict::Steady | Verdict::Recovered => self.interval,
            Verdict::Jitter { .. } | Verdict::Recovering { .. } | Verdict::WentUp => {
                self.short_backoff
            }
            Verdict::StillDown => self.medium_backoff,
            Verdict::WentDown => self.long_backoff,
        }
    }
}

/// A named set of equivalent endpoints monitored as one logical service.
#[derive(Debug, Clone)]
pub struct TargetGroup {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
    /// Always >= 1.
    pub failure_threshold: u32,
    pub on_down: Option<String>,
    pub on_up: Option<String>,
    pub probe_timeout_up: Duration,
    pub probe_timeout_down: Duration,
    pub cadence: Cadence,
    pub proxy: Option<Url>,
}
