//! Concurrent first-success probing of a target group.
//!
//! # Responsibilities
//! - Probe every endpoint of a group concurrently
//! - Return the first success without waiting for the rest
//! - Aggregate failures once every probe has failed
//!
//! # Design Decisions
//! - Each probe is time-boxed on its own; one slow endpoint cannot stall the race
//! - Probes run in a `JoinSet` which is shut down (aborted and joined) before
//!   `race` returns, so no probe task outlives its cycle
//! - Winner among simultaneous successes is whichever completes first

use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time;

use crate::health::probe::{Probe, ProbeResult};
use crate::health::target::Endpoint;

/// Races a probe across endpoints.
#[derive(Debug, Clone)]
pub struct Racer<P> {
    probe: P,
}

impl<P: Probe> Racer<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Probe all endpoints concurrently, each bounded by `timeout`.
    pub async fn race(&self, endpoints: &[Endpoint], timeout: Duration) -> ProbeResult {
        if endpoints.is_empty() {
            return ProbeResult::failure("no endpoints configured");
        }

        let mut probes = JoinSet::new();
        for endpoint in endpoints {
            let probe = self.probe.clone();
            let endpoint = endpoint.clone();
            probes.spawn(async move {
                match time::timeout(timeout, probe.probe(&endpoint, timeout)).await {
                    Ok(result) => result,
                    Err(_) => ProbeResult::failure(format!(
                        "{}: send request fail: timed out after {:?}",
                        endpoint, timeout
                    )),
                }
            });
        }

        let mut failures = Vec::with_capacity(endpoints.len());
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(result) if result.success => {
                    // Abort the stragglers and wait until they are gone.
                    probes.shutdown().await;
                    return result;
                }
                Ok(result) => failures.push(result.message),
                Err(e) => failures.push(format!("probe task failed: {}", e)),
            }
        }

        ProbeResult::failure(failures.join("; "))
    }
}
