// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::time::Duration;

use super::constants::{DEFAULT_MAX_COUNTER_AGE, DEFAULT_MINIMUM_CHECKS, MAX_MAX_COUNTER_AGE, MIN_MAX_COUNTER_AGE};
use super::decision::clamp_failure_threshold;
use super::{FailureGuard, OnTrip, OnTripArgs};
use crate::{GuardConfig, NotSet, Set, Tripwire};

/// Builder for a [`FailureGuard`].
///
/// Created by [`Tripwire::guard`]. Uses the type-state pattern so that a guard can only be
/// built once both required properties are configured:
///
/// - [`failure_threshold`][FailureGuardBuilder::failure_threshold] (or [`config`][FailureGuardBuilder::config])
/// - [`on_trip`][FailureGuardBuilder::on_trip]
///
/// # Type State
///
/// - `S1`: Tracks whether the failure threshold has been set
/// - `S2`: Tracks whether the trip callback has been set
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use tripwire::Tripwire;
///
/// let guard = Tripwire::new()
///     .guard("inventory")
///     .failure_threshold(0.25)
///     .minimum_checks(200)
///     .max_counter_age(Duration::from_secs(3600))
///     .on_trip(|args| eprintln!("{} tripped at {:.2}", args.identifier(), args.failure_rate()))
///     .build();
///
/// assert_eq!(guard.minimum_checks(), 200);
/// ```
#[derive(Debug)]
pub struct FailureGuardBuilder<S1 = Set, S2 = Set> {
    context: Tripwire,
    identifier: Cow<'static, str>,
    failure_threshold: f64,
    minimum_checks: u64,
    max_counter_age: Duration,
    on_trip: OnTrip,
    _state: PhantomData<fn(S1, S2)>,
}

impl FailureGuardBuilder<NotSet, NotSet> {
    pub(crate) fn new(identifier: Cow<'static, str>, context: &Tripwire) -> Self {
        Self {
            context: context.clone(),
            identifier,
            failure_threshold: 1.0,
            minimum_checks: DEFAULT_MINIMUM_CHECKS,
            max_counter_age: DEFAULT_MAX_COUNTER_AGE,
            on_trip: OnTrip::new(|_| {}),
            _state: PhantomData,
        }
    }
}

impl<S1, S2> FailureGuardBuilder<S1, S2> {
    /// Sets the ratio of failed to checked calls at which the guard trips.
    ///
    /// The comparison is inclusive: a threshold of `0.1` trips on exactly one failure in ten
    /// checks. Values above `1.0` are clamped to `1.0`. Zero, negative and NaN values are raised
    /// to the smallest positive threshold, which trips on the first failure once the minimum
    /// number of checks is reached.
    #[must_use]
    pub fn failure_threshold(mut self, threshold: f64) -> FailureGuardBuilder<Set, S2> {
        self.failure_threshold = clamp_failure_threshold(threshold);
        self.into_state()
    }

    /// Sets the callback invoked when a failing check crosses the threshold.
    ///
    /// The callback runs synchronously on the task that observed the failure, before the counters
    /// are reset. Concurrent failures can observe the same breach, so the callback may run more
    /// than once per breach and should be idempotent.
    #[must_use]
    pub fn on_trip(mut self, on_trip: impl Fn(OnTripArgs<'_>) + Send + Sync + 'static) -> FailureGuardBuilder<S1, Set> {
        self.on_trip = OnTrip::new(on_trip);
        self.into_state()
    }

    /// Sets how many checks a window must contain before a failure can trip the guard.
    ///
    /// **Default**: 1000. Zero is raised to one.
    #[must_use]
    pub fn minimum_checks(mut self, minimum_checks: u64) -> Self {
        self.minimum_checks = minimum_checks.max(1);
        self
    }

    /// Sets how long idle counters survive before the store expires them.
    ///
    /// Every check refreshes the expiry of both counters, so this only bounds idle periods.
    ///
    /// **Default**: 7 days. Values are clamped between one second and one hundred years.
    #[must_use]
    pub fn max_counter_age(mut self, max_counter_age: Duration) -> Self {
        self.max_counter_age = max_counter_age.clamp(MIN_MAX_COUNTER_AGE, MAX_MAX_COUNTER_AGE);
        self
    }

    /// Applies the threshold, minimum checks and counter age from a [`GuardConfig`].
    #[must_use]
    pub fn config(self, config: &GuardConfig) -> FailureGuardBuilder<Set, S2> {
        self.failure_threshold(config.failure_threshold)
            .minimum_checks(config.minimum_checks)
            .max_counter_age(Duration::from_secs(config.max_counter_age_secs))
    }

    fn into_state<T1, T2>(self) -> FailureGuardBuilder<T1, T2> {
        FailureGuardBuilder {
            context: self.context,
            identifier: self.identifier,
            failure_threshold: self.failure_threshold,
            minimum_checks: self.minimum_checks,
            max_counter_age: self.max_counter_age,
            on_trip: self.on_trip,
            _state: PhantomData,
        }
    }
}

impl FailureGuardBuilder<Set, Set> {
    /// Builds the guard.
    #[must_use]
    pub fn build(self) -> FailureGuard {
        FailureGuard::new(
            self.context,
            self.identifier,
            self.failure_threshold,
            self.minimum_checks,
            self.max_counter_age,
            self.on_trip,
        )
    }
}
