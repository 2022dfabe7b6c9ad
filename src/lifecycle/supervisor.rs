//! Health machine supervision.
//!
//! # Responsibilities
//! - Spawn one health machine task per target group
//! - Collect their status handles for readers
//! - Join every task after shutdown
//!
//! # Design Decisions
//! - Machines share nothing; each gets its own probe and shutdown receiver
//! - A machine that panics is logged at join time, the others keep running

use tokio::task::JoinHandle;

use crate::action::{ActionRunner, CommandRunner};
use crate::health::{HealthMachine, HttpProbe, Probe, StatusRegistry, TargetGroup};
use crate::lifecycle::Shutdown;

/// Owns the running health machine tasks.
#[derive(Debug, Default)]
pub struct Supervisor {
    tasks: Vec<(String, JoinHandle<()>)>,
    registry: StatusRegistry,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an HTTP-probing, command-running machine for every group.
    pub fn launch(groups: Vec<TargetGroup>, shutdown: &Shutdown) -> Self {
        let mut supervisor = Self::new();
        for group in groups {
            let probe = HttpProbe::with_proxy(group.proxy.clone());
            supervisor.spawn(HealthMachine::new(group, probe, CommandRunner::new()), shutdown);
        }
        tracing::info!(checkers = supervisor.len(), "Health machines launched");
        supervisor
    }

    /// Spawn a single machine.
    pub fn spawn<P: Probe, A: ActionRunner>(
        &mut self,
        machine: HealthMachine<P, A>,
        shutdown: &Shutdown,
    ) {
        let name = machine.group().name.clone();
        self.registry.register(machine.status_handle());
        let handle = tokio::spawn(machine.run(shutdown.subscribe()));
        self.tasks.push((name, handle));
    }

    /// Status handles of every spawned machine.
    pub fn statuses(&self) -> StatusRegistry {
        self.registry.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every machine to exit.
    pub async fn wait(self) {
        for (name, handle) in self.tasks {
            if let Err(e) = handle.await {
                tracing::error!(checker = %name, error = %e, "Health machine task failed");
            }
        }
    }
}
