//! Per-group health machine.
//!
//! # Responsibilities
//! - Race-probe the group every cycle (Up/Down use their own timeouts)
//! - Feed the result into `HealthState` and act on the verdict
//! - Run `on_down` / `on_up` exactly once per edge
//! - Sleep according to the cadence, stop promptly on shutdown

use std::time::Duration;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time;

use crate::action::ActionRunner;
use crate::health::probe::Probe;
use crate::health::race::Racer;
use crate::health::state::{HealthState, Status, Verdict};
use crate::health::status::StatusHandle;
use crate::health::target::TargetGroup;
use crate::observability::metrics;

/// A status edge that triggers an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Down,
    Up,
}

impl Edge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Down => "down",
            Edge::Up => "up",
        }
    }
}

/// Drives one target group forever (or until shutdown).
pub struct HealthMachine<P, A> {
    group: TargetGroup,
    racer: Racer<P>,
    runner: A,
    state: HealthState,
    status: StatusHandle,
}

impl<P: Probe, A: ActionRunner> HealthMachine<P, A> {
    pub fn new(group: TargetGroup, probe: P, runner: A) -> Self {
        let state = HealthState::new(group.failure_threshold);
        let status = StatusHandle::new(group.name.clone());
        Self {
            group,
            racer: Racer::new(probe),
            runner,
            state,
            status,
        }
    }

    pub fn group(&self) -> &TargetGroup {
        &self.group
    }

    pub fn state(&self) -> &HealthState {
        &self.state
    }

    pub fn runner(&self) -> &A {
        &self.runner
    }

    /// Read-only view for other tasks.
    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Run one poll cycle and return how long to sleep before the next.
    pub async fn step(&mut self) -> Duration {
        let name = self.group.name.as_str();
        let timeout = match self.state.status() {
            Status::Up => self.group.probe_timeout_up,
            Status::Down => self.group.probe_timeout_down,
        };

        let result = self.racer.race(&self.group.endpoints, timeout).await;
        tracing::info!(
            checker = %name,
            success = result.success,
            message = %result.message,
            "Check result"
        );
        metrics::record_check(name, result.success);

        let verdict = self.state.record(result.success);
        match verdict {
            Verdict::Steady => {}
            Verdict::Recovered => tracing::info!(checker = %name, "Recover"),
            Verdict::Jitter { fail_count } => tracing::info!(
                checker = %name,
                fail_count,
                threshold = self.state.threshold(),
                "Jitter"
            ),
            Verdict::WentDown => {
                tracing::warn!(checker = %name, "From UP to DOWN");
                metrics::record_transition(name, Status::Down);
            }
            Verdict::Recovering { fail_count } => tracing::debug!(
                checker = %name,
                remaining = fail_count,
                "Recovering"
            ),
            Verdict::WentUp => {
                tracing::info!(checker = %name, "From DOWN to UP");
                metrics::record_transition(name, Status::Up);
            }
            Verdict::StillDown => tracing::debug!(checker = %name, "Still down"),
        }

        self.status.publish(&self.state, verdict.is_transition());
        metrics::record_state(name, &self.state);

        match verdict {
            Verdict::WentDown => self.fire(Edge::Down).await,
            Verdict::WentUp => self.fire(Edge::Up).await,
            _ => {}
        }

        self.group.cadence.delay_for(verdict)
    }

    async fn fire(&self, edge: Edge) {
        let command = match edge {
            Edge::Down => self.group.on_down.as_deref(),
            Edge::Up => self.group.on_up.as_deref(),
        };
        let Some(command) = command.filter(|c| !c.trim().is_empty()) else {
            return;
        };

        let outcome = self.runner.run(command).await;
        metrics::record_action(&self.group.name, edge, outcome);
        tracing::info!(
            checker = %self.group.name,
            edge = edge.as_str(),
            outcome = outcome.as_str(),
            "Action executed"
        );
    }

    /// Poll until `shutdown` fires (or its sender is dropped).
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            checker = %self.group.name,
            endpoints = self.group.endpoints.len(),
            threshold = self.group.failure_threshold,
            timeout_up = ?self.group.probe_timeout_up,
            timeout_down = ?self.group.probe_timeout_down,
            "Health machine starting"
        );

        loop {
            // Checked before every network round.
            match shutdown.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => break,
            }

            let delay = self.step().await;

            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(checker = %self.group.name, "Health machine received shutdown signal, exiting loop");
    }
}
