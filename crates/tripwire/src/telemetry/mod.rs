// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Well-known telemetry keys.
//!
//! Guards report through [`tracing`](https://docs.rs/tracing) events when the `logs` feature is
//! enabled and through an OpenTelemetry counter named `tripwire.event` when the `metrics` feature
//! is enabled. The constants below are the attribute keys attached to those metrics; log events
//! use the same names without the `tripwire.` prefix.
//!
//! | Event | Level | Fields |
//! |---|---|---|
//! | `tripwire.guard.tripped` | `WARN` | `guard.id`, `guard.failed`, `guard.checked`, `guard.failure_rate`, `guard.failure_threshold` |
//! | `tripwire.guard.reset` | `DEBUG` | `guard.id` |

#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;

#[cfg(test)]
pub(crate) mod testing;

/// Key used to annotate the identifier of the guard that emitted an event.
pub const GUARD_ID: &str = "tripwire.guard.id";

/// Key used to annotate the kind of event being reported.
///
/// Values are [`TRIPPED_EVENT_NAME`] and [`RESET_EVENT_NAME`].
pub const EVENT_NAME: &str = "tripwire.event.name";

/// Reported under [`EVENT_NAME`] when a guard trips.
pub const TRIPPED_EVENT_NAME: &str = "guard_tripped";

/// Reported under [`EVENT_NAME`] when a guard's counters are reset.
pub const RESET_EVENT_NAME: &str = "guard_reset";

#[derive(Debug, Clone)]
pub(crate) struct TelemetryHelper {
    #[cfg(any(feature = "metrics", test))]
    pub(crate) event_reporter: Option<opentelemetry::metrics::Counter<u64>>,
    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(dead_code, reason = "only read when logs are compiled in")
    )]
    pub(crate) logs_enabled: bool,
}

impl TelemetryHelper {
    #[cfg(any(feature = "metrics", test))]
    pub(crate) fn metrics_enabled(&self) -> bool {
        self.event_reporter.is_some()
    }

    #[cfg(any(feature = "metrics", test))]
    pub(crate) fn report_metrics(&self, attributes: &[opentelemetry::KeyValue]) {
        if let Some(reporter) = &self.event_reporter {
            reporter.add(1, attributes);
        }
    }
}
