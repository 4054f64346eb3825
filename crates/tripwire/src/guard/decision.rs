// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::constants::MIN_FAILURE_THRESHOLD;

/// Decides whether a failing check trips the guard.
///
/// `checked` is the count returned when the failing check started, not a fresh read. Both
/// gates are inclusive.
#[expect(clippy::cast_precision_loss, reason = "counts beyond 2^53 only lose ratio precision")]
pub(crate) fn should_trip(failed: u64, checked: u64, failure_threshold: f64, minimum_checks: u64) -> bool {
    if checked == 0 || checked < minimum_checks {
        return false;
    }

    failed as f64 / checked as f64 >= failure_threshold
}

/// Clamps a failure threshold into `(0, 1]`.
pub(crate) fn clamp_failure_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() || threshold <= 0.0 {
        MIN_FAILURE_THRESHOLD
    } else {
        threshold.min(1.0)
    }
}
