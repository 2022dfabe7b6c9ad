//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds >= 1, timeouts > 0)
//! - Detect duplicate checker names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::{CheckerConfig, GuardConfig};

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("checker #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("checker '{0}' is defined more than once")]
    DuplicateName(String),

    #[error("checker '{0}' has no targets")]
    NoTargets(String),

    #[error("checker '{checker}' target #{index} has an empty address")]
    EmptyAddress { checker: String, index: usize },

    #[error("checker '{0}' threshold must be at least 1")]
    ZeroThreshold(String),

    #[error("checker '{checker}' {field} must be greater than zero")]
    ZeroDuration { checker: String, field: &'static str },

    #[error("checker '{checker}' proxy '{proxy}' is not a valid http:// URL")]
    InvalidProxy { checker: String, proxy: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, checker) in config.checkers.iter().enumerate() {
        if checker.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        } else if !seen.insert(checker.name.as_str()) {
            errors.push(ValidationError::DuplicateName(checker.name.clone()));
        }
        validate_checker(checker, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_checker(checker: &CheckerConfig, errors: &mut Vec<ValidationError>) {
    let name = &checker.name;

    if checker.targets.is_empty() {
        errors.push(ValidationError::NoTargets(name.clone()));
    }
    for (index, target) in checker.targets.iter().enumerate() {
        if target.address.trim().is_empty() {
            errors.push(ValidationError::EmptyAddress {
                checker: name.clone(),
                index,
            });
        }
    }

    if checker.threshold == 0 {
        errors.push(ValidationError::ZeroThreshold(name.clone()));
    }

    let durations = [
        ("timeout_ms", Some(checker.timeout_ms)),
        ("timeout_down_ms", checker.timeout_down_ms),
        ("cadence.interval_ms", Some(checker.cadence.interval_ms)),
        ("cadence.short_backoff_ms", Some(checker.cadence.short_backoff_ms)),
        ("cadence.medium_backoff_ms", Some(checker.cadence.medium_backoff_ms)),
        ("cadence.long_backoff_ms", Some(checker.cadence.long_backoff_ms)),
    ];
    for (field, value) in durations {
        if value == Some(0) {
            errors.push(ValidationError::ZeroDuration {
                checker: name.clone(),
                field,
            });
        }
    }

    let proxy = checker.proxy.trim();
    if !proxy.is_empty() {
        let valid = Url::parse(proxy)
            .map(|url| url.scheme() == "http" && url.host_str().is_some())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidProxy {
                checker: name.clone(),
                proxy: proxy.to_string(),
            });
        }
    }
}
