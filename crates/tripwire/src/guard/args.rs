// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Arguments for the [`on_trip`][super::FailureGuardBuilder::on_trip] callback.
///
/// Describes the failing check that crossed the threshold.
#[derive(Debug)]
#[non_exhaustive]
pub struct OnTripArgs<'a> {
    pub(crate) identifier: &'a str,
    pub(crate) failed: u64,
    pub(crate) checked: u64,
}

impl OnTripArgs<'_> {
    /// Returns the identifier of the guard that tripped.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier
    }

    /// Returns the failed count observed by the tripping check.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Returns the checked count recorded when the tripping check started.
    #[must_use]
    pub fn checked(&self) -> u64 {
        self.checked
    }

    /// Returns `failed / checked`.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "counts beyond 2^53 only lose ratio precision")]
    pub fn failure_rate(&self) -> f64 {
        if self.checked == 0 {
            return 0.0;
        }

        self.failed as f64 / self.checked as f64
    }
}
