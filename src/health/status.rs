//! Read-only status publication.
//!
//! The health machine owns its `HealthState` exclusively. After every cycle it
//! publishes a copy into a `StatusHandle`, whose atomics can be read from any
//! task (diagnostics endpoint, metrics) without touching the machine.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::health::state::{HealthState, Status};

#[derive(Debug)]
struct Published {
    name: String,
    status: AtomicU8,
    fail_count: AtomicU32,
    cycles: AtomicU64,
    transitions: AtomicU64,
}

/// Shared, lock-free view of one checker's state.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<Published>,
}

/// Point-in-time copy of a checker's published state.
///
/// Fields are loaded individually, so a snapshot taken mid-publish may mix
/// two consecutive cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub name: String,
    pub status: Status,
    pub fail_count: u32,
    pub cycles: u64,
    pub transitions: u64,
}

impl StatusHandle {
    /// A fresh handle reporting Up with no failures.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Published {
                name: name.into(),
                status: AtomicU8::new(Status::Up as u8),
                fail_count: AtomicU32::new(0),
                cycles: AtomicU64::new(0),
                transitions: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn status(&self) -> Status {
        Status::from(self.inner.status.load(Ordering::Acquire))
    }

    /// Publish the state at the end of a cycle.
    pub fn publish(&self, state: &HealthState, transitioned: bool) {
        self.inner.fail_count.store(state.fail_count(), Ordering::Relaxed);
        self.inner.cycles.fetch_add(1, Ordering::Relaxed);
        if transitioned {
            self.inner.transitions.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.status.store(state.status() as u8, Ordering::Release);
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let status = self.status();
        StatusSnapshot {
            name: self.inner.name.clone(),
            status,
            fail_count: self.inner.fail_count.load(Ordering::Relaxed),
            cycles: self.inner.cycles.load(Ordering::Relaxed),
            transitions: self.inner.transitions.load(Ordering::Relaxed),
        }
    }
}

/// All checkers' status handles, in launch order.
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    handles: Vec<StatusHandle>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: StatusHandle) {
        self.handles.push(handle);
    }

    pub fn get(&self, name: &str) -> Option<&StatusHandle> {
        self.handles.iter().find(|h| h.name() == name)
    }

    pub fn snapshots(&self) -> Vec<StatusSnapshot> {
        self.handles.iter().map(StatusHandle::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publishes_state_and_counts() {
        let handle = StatusHandle::new("uplink");
        let reader = handle.clone();
        let mut state = HealthState::new(2);

        let verdict = state.record(false);
        handle.publish(&state, verdict.is_transition());
        assert_eq!(reader.status(), Status::Up);
        assert_eq!(reader.snapshot().fail_count, 1);

        let verdict = state.record(false);
        handle.publish(&state, verdict.is_transition());

        let snapshot = reader.snapshot();
        assert_eq!(snapshot.status, Status::Down);
        assert_eq!(snapshot.fail_count, 2);
        assert_eq!(snapshot.cycles, 2);
        assert_eq!(snapshot.transitions, 1);
    }

    #[test]
    fn test_registry_lookup_by_name() {
        let mut registry = StatusRegistry::new();
        registry.register(StatusHandle::new("a"));
        registry.register(StatusHandle::new("b"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("b").map(StatusHandle::name), Some("b"));
        assert!(registry.get("c").is_none());
        let names: Vec<_> = registry.snapshots().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_snapshot_serializes_status_uppercase() {
        let json = serde_json::to_value(StatusHandle::new("vpn").snapshot()).unwrap();
        assert_eq!(json["status"], "UP");
        assert_eq!(json["name"], "vpn");
    }
}
