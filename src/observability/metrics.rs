//! Metrics collection and exposition.
//!
//! # Metrics
//! - `netguard_checks_total` (counter): race results by checker, result
//! - `netguard_checker_up` (gauge): 1=up, 0=down
//! - `netguard_checker_fail_count` (gauge): current hysteresis counter
//! - `netguard_transitions_total` (counter): edges by checker, target status
//! - `netguard_actions_total` (counter): actions by checker, edge, outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::action::ActionOutcome;
use crate::health::machine::Edge;
use crate::health::state::{HealthState, Status};

/// Install the Prometheus recorder with a scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_check(checker: &str, success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!(
        "netguard_checks_total",
        "checker" => checker.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_state(checker: &str, state: &HealthState) {
    let up = if state.status() == Status::Up { 1.0 } else { 0.0 };
    metrics::gauge!("netguard_checker_up", "checker" => checker.to_string()).set(up);
    metrics::gauge!("netguard_checker_fail_count", "checker" => checker.to_string())
        .set(f64::from(state.fail_count()));
}

pub fn record_transition(checker: &str, to: Status) {
    let to = match to {
        Status::Up => "up",
        Status::Down => "down",
    };
    metrics::counter!(
        "netguard_transitions_total",
        "checker" => checker.to_string(),
        "to" => to
    )
    .increment(1);
}

pub fn record_action(checker: &str, edge: Edge, outcome: ActionOutcome) {
    metrics::counter!(
        "netguard_actions_total",
        "checker" => checker.to_string(),
        "edge" => edge.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
