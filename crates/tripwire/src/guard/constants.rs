// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// Default number of checks that must be observed in a window before a failure can trip the guard.
pub(crate) const DEFAULT_MINIMUM_CHECKS: u64 = 1_000;

/// Default time-to-live applied to both counters on every check.
pub(crate) const DEFAULT_MAX_COUNTER_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Smallest accepted failure threshold. Non-positive and NaN thresholds are raised to this.
pub(crate) const MIN_FAILURE_THRESHOLD: f64 = f64::MIN_POSITIVE;

/// Shortest accepted counter age. Remote stores expire in whole seconds.
pub(crate) const MIN_MAX_COUNTER_AGE: Duration = Duration::from_secs(1);

/// Longest accepted counter age, roughly a century.
pub(crate) const MAX_MAX_COUNTER_AGE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

pub(crate) const CHECKED_SUFFIX: &str = "checked";
pub(crate) const FAILED_SUFFIX: &str = "failed";
