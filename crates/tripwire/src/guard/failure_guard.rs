// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use tripwire_store::{CounterKey, CounterStore, DynamicStore, Error};

use super::constants::{CHECKED_SUFFIX, FAILED_SUFFIX};
use super::decision::should_trip;
use super::{OnTrip, OnTripArgs};
use crate::Tripwire;
use crate::telemetry::TelemetryHelper;
#[cfg(any(feature = "metrics", test))]
use crate::telemetry::{EVENT_NAME, GUARD_ID, RESET_EVENT_NAME, TRIPPED_EVENT_NAME};

/// The counter values of a guard's current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub struct Counts {
    /// Number of checks started in the window.
    pub checked: u64,
    /// Number of checks in the window whose work failed.
    pub failed: u64,
}

#[derive(Debug)]
struct GuardInner {
    context: Tripwire,
    identifier: Cow<'static, str>,
    keys: [CounterKey; 2],
    failure_threshold: f64,
    minimum_checks: u64,
    max_counter_age: Duration,
    on_trip: OnTrip,
    telemetry: TelemetryHelper,
}

/// Observes the outcome of an operation and reports when its failure rate crosses a threshold.
///
/// Each guard counts the checks it starts and the checks whose work fails in two counters held by
/// the [`Tripwire`]'s counter store. When a failing check finds that at least
/// [`minimum_checks`][Self::minimum_checks] checks were made and that the failure ratio reached
/// [`failure_threshold`][Self::failure_threshold], the trip callback runs and both counters are
/// deleted, starting a new window.
///
/// A guard never blocks or alters work. Building a circuit breaker on top of it means reacting
/// to the trip callback.
///
/// Guards are cheap to clone and safe to share between tasks. Counters live in the store, so
/// guards with the same namespace and identifier share a window, including across processes
/// when the store is remote.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// use tick::Clock;
/// use tripwire::Tripwire;
/// use tripwire_memory::InMemoryStore;
///
/// # futures::executor::block_on(async {
/// let tripwire = Tripwire::new();
/// tripwire.enable(InMemoryStore::new(Clock::new_frozen()));
///
/// let tripped = Arc::new(AtomicBool::new(false));
/// let guard = tripwire
///     .guard("payments")
///     .failure_threshold(0.5)
///     .minimum_checks(2)
///     .on_trip({
///         let tripped = Arc::clone(&tripped);
///         move |_args| tripped.store(true, Ordering::SeqCst)
///     })
///     .build();
///
/// let ok = guard.check(|| async { Ok::<_, String>(1) }).await?;
/// assert_eq!(ok, Ok(1));
///
/// let failed = guard.check(|| async { Err::<u32, _>("declined".to_string()) }).await?;
/// assert_eq!(failed, Err("declined".to_string()));
/// assert!(tripped.load(Ordering::SeqCst));
/// # Ok::<(), tripwire_store::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FailureGuard {
    inner: Arc<GuardInner>,
}

impl FailureGuard {
    pub(crate) fn new(
        context: Tripwire,
        identifier: Cow<'static, str>,
        failure_threshold: f64,
        minimum_checks: u64,
        max_counter_age: Duration,
        on_trip: OnTrip,
    ) -> Self {
        let keys = [
            CounterKey::namespaced(context.namespace(), &identifier, CHECKED_SUFFIX),
            CounterKey::namespaced(context.namespace(), &identifier, FAILED_SUFFIX),
        ];
        let telemetry = context.create_telemetry();

        Self {
            inner: Arc::new(GuardInner {
                context,
                identifier,
                keys,
                failure_threshold,
                minimum_checks,
                max_counter_age,
                on_trip,
                telemetry,
            }),
        }
    }

    /// Runs `work` under the guard and returns its outcome unchanged.
    ///
    /// The checked counter is incremented, and both counters have their expiry refreshed, before
    /// `work` starts. If `work` fails, the failed counter is incremented and the trip condition is
    /// evaluated against the checked count recorded at the start of this call. On a trip the
    /// callback runs and both counters are deleted.
    ///
    /// The inner `Result` is the outcome of `work`. The outer `Result` reports counter store
    /// failures; when the store fails after `work` ran, the store error is returned instead of the
    /// outcome.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NotConfigured`][tripwire_store::ErrorKind::NotConfigured] if the
    ///   [`Tripwire`] has no store. `work` is not run.
    /// - [`ErrorKind::Unavailable`][tripwire_store::ErrorKind::Unavailable] if the store fails.
    ///   `work` is not run when the initial increment fails.
    pub async fn check<F, Fut, T, E>(&self, work: F) -> Result<Result<T, E>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let store = self.inner.context.store()?;
        let checked = store
            .increment_and_expire(self.checked_key(), &self.inner.keys, self.inner.max_counter_age)
            .await?;

        let outcome = work().await;

        if outcome.is_err() {
            self.record_failure(&store, checked).await?;
        }

        Ok(outcome)
    }

    /// Deletes both counters, starting a new window.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not configured or fails.
    pub async fn reset(&self) -> Result<(), Error> {
        let store = self.inner.context.store()?;
        self.reset_in(&store).await
    }

    /// Reads both counters of the current window.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not configured or fails.
    pub async fn counts(&self) -> Result<Counts, Error> {
        let store = self.inner.context.store()?;
        let checked = store.get(self.checked_key()).await?;
        let failed = store.get(self.failed_key()).await?;
        Ok(Counts { checked, failed })
    }

    /// Returns the identifier this guard was built with.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    /// Returns the key of the checked counter.
    #[must_use]
    pub fn checked_key(&self) -> &CounterKey {
        &self.inner.keys[0]
    }

    /// Returns the key of the failed counter.
    #[must_use]
    pub fn failed_key(&self) -> &CounterKey {
        &self.inner.keys[1]
    }

    /// Returns the failure ratio at which the guard trips.
    #[must_use]
    pub fn failure_threshold(&self) -> f64 {
        self.inner.failure_threshold
    }

    /// Returns the number of checks a window needs before it can trip.
    #[must_use]
    pub fn minimum_checks(&self) -> u64 {
        self.inner.minimum_checks
    }

    /// Returns the expiry applied to both counters on every check.
    #[must_use]
    pub fn max_counter_age(&self) -> Duration {
        self.inner.max_counter_age
    }

    async fn record_failure(&self, store: &DynamicStore, checked: u64) -> Result<(), Error> {
        let failed = store.increment(self.failed_key()).await?;

        if !should_trip(failed, checked, self.inner.failure_threshold, self.inner.minimum_checks) {
            return Ok(());
        }

        let args = OnTripArgs {
            identifier: &self.inner.identifier,
            failed,
            checked,
        };
        self.report_trip(&args);
        self.inner.on_trip.call(args);

        self.reset_in(store).await
    }

    async fn reset_in(&self, store: &DynamicStore) -> Result<(), Error> {
        store.delete_all(&self.inner.keys).await?;
        self.report_reset();
        Ok(())
    }

    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(unused_variables, reason = "only read by log events")
    )]
    fn report_trip(&self, args: &OnTripArgs<'_>) {
        #[cfg(any(feature = "metrics", test))]
        if self.inner.telemetry.metrics_enabled() {
            self.inner.telemetry.report_metrics(&[
                opentelemetry::KeyValue::new(GUARD_ID, self.inner.identifier.clone()),
                opentelemetry::KeyValue::new(EVENT_NAME, TRIPPED_EVENT_NAME),
            ]);
        }

        #[cfg(any(feature = "logs", test))]
        if self.inner.telemetry.logs_enabled {
            tracing::event!(
                name: "tripwire.guard.tripped",
                tracing::Level::WARN,
                guard.id = %self.inner.identifier,
                guard.failed = args.failed,
                guard.checked = args.checked,
                guard.failure_rate = args.failure_rate(),
                guard.failure_threshold = self.inner.failure_threshold,
            );
        }
    }

    fn report_reset(&self) {
        #[cfg(any(feature = "metrics", test))]
        if self.inner.telemetry.metrics_enabled() {
            self.inner.telemetry.report_metrics(&[
                opentelemetry::KeyValue::new(GUARD_ID, self.inner.identifier.clone()),
                opentelemetry::KeyValue::new(EVENT_NAME, RESET_EVENT_NAME),
            ]);
        }

        #[cfg(any(feature = "logs", test))]
        if self.inner.telemetry.logs_enabled {
            tracing::event!(
                name: "tripwire.guard.reset",
                tracing::Level::DEBUG,
                guard.id = %self.inner.identifier,
            );
        }
    }
}
