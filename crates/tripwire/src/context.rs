// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::RwLock;
use tripwire_store::{CounterStore, DynamicStore, DynamicStoreExt, Error};

use crate::NotSet;
use crate::guard::FailureGuardBuilder;
use crate::telemetry::TelemetryHelper;

pub(crate) const DEFAULT_NAMESPACE: &str = "tripwire";

/// The shared context that every [`FailureGuard`][crate::FailureGuard] draws its counter store
/// and telemetry from.
///
/// Assemble one `Tripwire` at startup, hand clones of it to the code that creates guards, and
/// call [`enable`][Tripwire::enable] once a counter store is available. Clones share the store
/// slot, so enabling, replacing or disabling the store is seen by every guard on its next
/// operation. Guard operations fail with [`ErrorKind::NotConfigured`][tripwire_store::ErrorKind::NotConfigured]
/// while no store is enabled.
///
/// The `with_namespace`, `enable_logs` and `enable_metrics` settings are copied into each guard
/// when it is built and are meant to be applied before the first guard is created.
///
/// # Examples
///
/// ```
/// use tick::Clock;
/// use tripwire::Tripwire;
/// use tripwire_memory::InMemoryStore;
///
/// let tripwire = Tripwire::new().with_namespace("billing");
/// assert!(!tripwire.is_enabled());
///
/// tripwire.enable(InMemoryStore::new(Clock::new_frozen()));
/// assert!(tripwire.is_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct Tripwire {
    store: Arc<RwLock<Option<DynamicStore>>>,
    namespace: Cow<'static, str>,
    #[cfg(any(feature = "metrics", test))]
    meter: Option<opentelemetry::metrics::Meter>,
    logs_enabled: bool,
}

impl Default for Tripwire {
    fn default() -> Self {
        Self::new()
    }
}

impl Tripwire {
    /// Creates a context with no counter store and the `tripwire` key namespace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(None)),
            namespace: Cow::Borrowed(DEFAULT_NAMESPACE),
            #[cfg(any(feature = "metrics", test))]
            meter: None,
            logs_enabled: false,
        }
    }

    /// Sets the prefix of every counter key, producing `<namespace>:<identifier>:checked`.
    ///
    /// Processes that should share counters must use the same namespace.
    #[must_use]
    pub fn with_namespace(self, namespace: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            ..self
        }
    }

    /// Enables metrics reporting with the given OpenTelemetry meter provider.
    #[must_use]
    #[cfg(any(feature = "metrics", test))]
    pub fn enable_metrics(self, provider: &dyn opentelemetry::metrics::MeterProvider) -> Self {
        Self {
            meter: Some(crate::telemetry::metrics::create_meter(provider)),
            ..self
        }
    }

    /// Enables structured logging of guard events.
    #[must_use]
    #[cfg(any(feature = "logs", test))]
    pub fn enable_logs(self) -> Self {
        Self {
            logs_enabled: true,
            ..self
        }
    }

    /// Installs `store` as the counter store, replacing any previous one.
    ///
    /// Operations already in flight finish against the store they started with.
    pub fn enable(&self, store: impl CounterStore + 'static) {
        self.enable_dynamic(store.into_dynamic());
    }

    /// Installs an already type-erased store, replacing any previous one.
    pub fn enable_dynamic(&self, store: DynamicStore) {
        *self.store.write() = Some(store);
    }

    /// Removes the counter store and returns it, if one was installed.
    pub fn disable(&self) -> Option<DynamicStore> {
        self.store.write().take()
    }

    /// Returns true if a counter store is installed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.store.read().is_some()
    }

    /// Returns the installed counter store.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotConfigured`][tripwire_store::ErrorKind::NotConfigured] if no
    /// store is installed.
    pub fn store(&self) -> Result<DynamicStore, Error> {
        self.store.read().clone().ok_or_else(Error::not_configured)
    }

    /// Returns the counter key namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Starts building a guard for the operation named `identifier`.
    ///
    /// Guards with the same namespace and identifier share counters.
    #[must_use]
    pub fn guard(&self, identifier: impl Into<Cow<'static, str>>) -> FailureGuardBuilder<NotSet, NotSet> {
        FailureGuardBuilder::new(identifier.into(), self)
    }

    pub(crate) fn create_telemetry(&self) -> TelemetryHelper {
        TelemetryHelper {
            #[cfg(any(feature = "metrics", test))]
            event_reporter: self.meter.as_ref().map(crate::telemetry::metrics::create_event_counter),
            logs_enabled: self.logs_enabled,
        }
    }
}
