//! Target group health state machine.
//!
//! # States
//! - Up: target reachable
//! - Down: target confirmed unreachable
//!
//! # State Transitions
//! ```text
//! Up → Down: fail_count reaches threshold (fail_count += 1 per failure)
//! Down → Up: fail_count drains to 0 (fail_count -= 1 per success)
//! ```
//!
//! # Design Decisions
//! - Symmetric hysteresis: `threshold` observations in a row either way
//! - fail_count saturates at threshold when going Down
//! - A failure while Down resets fail_count to threshold (no partial credit)
//! - Pure bookkeeping, no I/O: the machine loop logs and acts on the verdict

use serde::Serialize;

/// Reported status of a target group.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Down = 0,
    Up = 1,
}

impl From<u8> for Status {
    fn from(val: u8) -> Self {
        match val {
            0 => Status::Down,
            _ => Status::Up,
        }
    }
}

/// Outcome of recording one cycle's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Up, success, nothing pending.
    Steady,
    /// Up, success after one or more jitters.
    Recovered,
    /// Up, failure below threshold.
    Jitter { fail_count: u32 },
    /// Up → Down.
    WentDown,
    /// Down, success, still inside the confirmation window.
    Recovering { fail_count: u32 },
    /// Down → Up.
    WentUp,
    /// Down, failure; recovery progress reset.
    StillDown,
}

impl Verdict {
    /// Whether this verdict is a status edge.
    pub fn is_transition(&self) -> bool {
        matches!(self, Verdict::WentDown | Verdict::WentUp)
    }
}

/// Status and failure counter of one target group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthState {
    status: Status,
    fail_count: u32,
    threshold: u32,
}

impl HealthState {
    /// Start Up with no failures. A zero threshold is treated as 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            status: Status::Up,
            fail_count: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Always within `[0, threshold]`.
    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record one race result and return what happened.
    pub fn record(&mut self, success: bool) -> Verdict {
        match (self.status, success) {
            (Status::Up, true) => {
                let had_failures = self.fail_count != 0;
                self.fail_count = 0;
                if had_failures {
                    Verdict::Recovered
                } else {
                    Verdict::Steady
                }
            }
            (Status::Up, false) => {
                self.fail_count += 1;
                if self.fail_count >= self.threshold {
                    self.status = Status::Down;
                    self.fail_count = self.threshold;
                    Verdict::WentDown
                } else {
                    Verdict::Jitter {
                        fail_count: self.fail_count,
                    }
                }
            }
            (Status::Down, true) => {
                self.fail_count = self.fail_count.saturating_sub(1);
                if self.fail_count == 0 {
                    self.status = Status::Up;
                    Verdict::WentUp
                } else {
                    Verdict::Recovering {
                        fail_count: self.fail_count,
                    }
                }
            }
            (Status::Down, false) => {
                self.fail_count = self.threshold;
                Verdict::StillDown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn down_state(threshold: u32) -> HealthState {
        let mut state = HealthState::new(threshold);
        for _ in 0..threshold {
            state.record(false);
        }
        assert_eq!(state.status(), Status::Down);
        state
    }

    #[test]
    fn test_starts_up_with_no_failures() {
        let state = HealthState::new(3);
        assert_eq!(state.status(), Status::Up);
        assert_eq!(state.fail_count(), 0);
    }

    #[test]
    fn test_threshold_failures_go_down() {
        for threshold in 1..=6 {
            let mut state = HealthState::new(threshold);
            for i in 1..threshold {
                assert_eq!(state.record(false), Verdict::Jitter { fail_count: i });
                assert_eq!(state.status(), Status::Up);
            }
            assert_eq!(state.record(false), Verdict::WentDown);
            assert_eq!(state.status(), Status::Down);
            assert_eq!(state.fail_count(), threshold);
        }
    }

    #[test]
    fn test_one_short_of_threshold_then_success_stays_up() {
        for threshold in 2..=6 {
            let mut state = HealthState::new(threshold);
            for _ in 1..threshold {
                state.record(false);
            }
            assert_eq!(state.record(true), Verdict::Recovered);
            assert_eq!(state.status(), Status::Up);
            assert_eq!(state.fail_count(), 0);
        }
    }

    #[test]
    fn test_threshold_successes_come_back_up() {
        for threshold in 1..=6 {
            let mut state = down_state(threshold);
            for remaining in (1..threshold).rev() {
                assert_eq!(
                    state.record(true),
                    Verdict::Recovering {
                        fail_count: remaining
                    }
                );
                assert_eq!(state.status(), Status::Down);
            }
            assert_eq!(state.record(true), Verdict::WentUp);
            assert_eq!(state.status(), Status::Up);
            assert_eq!(state.fail_count(), 0);
        }
    }

    #[test]
    fn test_failure_during_recovery_resets_progress() {
        let mut state = down_state(4);
        state.record(true);
        state.record(true);
        assert_eq!(state.fail_count(), 2);

        assert_eq!(state.record(false), Verdict::StillDown);
        assert_eq!(state.fail_count(), 4);

        // Full window needed again.
        for _ in 0..3 {
            state.record(true);
        }
        assert_eq!(state.status(), Status::Down);
        assert_eq!(state.record(true), Verdict::WentUp);
    }

    #[test]
    fn test_threshold_one_flips_every_observation() {
        let mut state = HealthState::new(1);
        assert_eq!(state.record(false), Verdict::WentDown);
        assert_eq!(state.record(true), Verdict::WentUp);
        assert_eq!(state.record(false), Verdict::WentDown);
        assert_eq!(state.record(false), Verdict::StillDown);
        assert_eq!(state.record(true), Verdict::WentUp);
        assert_eq!(state.record(true), Verdict::Steady);
    }

    #[test]
    fn test_zero_threshold_is_clamped() {
        let mut state = HealthState::new(0);
        assert_eq!(state.threshold(), 1);
        assert_eq!(state.record(false), Verdict::WentDown);
    }

    #[test]
    fn test_status_round_trips_through_u8() {
        assert_eq!(Status::from(Status::Up as u8), Status::Up);
        assert_eq!(Status::from(Status::Down as u8), Status::Down);
    }

    proptest! {
        #[test]
        fn test_fail_count_stays_in_range(
            threshold in 1u32..10,
            observations in proptest::collection::vec(any::<bool>(), 0..200),
        ) {
            let mut state = HealthState::new(threshold);
            for success in observations {
                let before = state.status();
                let verdict = state.record(success);
                prop_assert!(state.fail_count() <= threshold);
                prop_assert_eq!(verdict.is_transition(), before != state.status());
                if state.status() == Status::Up && success {
                    prop_assert_eq!(state.fail_count(), 0);
                }
            }
        }
    }
}
