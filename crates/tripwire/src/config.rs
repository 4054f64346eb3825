// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::guard::constants::{DEFAULT_MAX_COUNTER_AGE, DEFAULT_MINIMUM_CHECKS};

/// Serializable guard settings, applied with [`FailureGuardBuilder::config`][crate::FailureGuardBuilder::config].
///
/// Only `failure_threshold` is required when deserializing; the other fields fall back to the
/// same defaults as the builder.
///
/// # Examples
///
/// ```
/// use tripwire::{GuardConfig, Tripwire};
///
/// let config = GuardConfig::new(0.2).with_minimum_checks(50);
///
/// let guard = Tripwire::new()
///     .guard("search")
///     .config(&config)
///     .on_trip(|_| {})
///     .build();
///
/// assert_eq!(guard.minimum_checks(), 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct GuardConfig {
    /// Failure ratio at which the guard trips, in `(0, 1]`.
    pub failure_threshold: f64,

    /// Checks a window must contain before it can trip.
    #[cfg_attr(feature = "serde", serde(default = "default_minimum_checks"))]
    pub minimum_checks: u64,

    /// Expiry applied to both counters on every check, in seconds.
    #[cfg_attr(feature = "serde", serde(default = "default_max_counter_age_secs"))]
    pub max_counter_age_secs: u64,
}

#[cfg(feature = "serde")]
fn default_minimum_checks() -> u64 {
    DEFAULT_MINIMUM_CHECKS
}

#[cfg(feature = "serde")]
fn default_max_counter_age_secs() -> u64 {
    DEFAULT_MAX_COUNTER_AGE.as_secs()
}

impl GuardConfig {
    /// Creates a config with the given threshold and default minimum checks and counter age.
    #[must_use]
    pub fn new(failure_threshold: f64) -> Self {
        Self {
            failure_threshold,
            minimum_checks: DEFAULT_MINIMUM_CHECKS,
            max_counter_age_secs: DEFAULT_MAX_COUNTER_AGE.as_secs(),
        }
    }

    /// Sets the minimum number of checks.
    #[must_use]
    pub fn with_minimum_checks(mut self, minimum_checks: u64) -> Self {
        self.minimum_checks = minimum_checks;
        self
    }

    /// Sets the counter age in seconds.
    #[must_use]
    pub fn with_max_counter_age_secs(mut self, max_counter_age_secs: u64) -> Self {
        self.max_counter_age_secs = max_counter_age_secs;
        self
    }
}
