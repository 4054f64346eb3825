// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory counter stores.

use tick::Clock;

use crate::store::InMemoryStore;

/// Builder for configuring an [`InMemoryStore`].
///
/// # Examples
///
/// ```
/// use tick::Clock;
/// use tripwire_memory::InMemoryStore;
///
/// let store = InMemoryStore::builder(Clock::new_frozen())
///     .initial_capacity(64)
///     .build();
/// assert!(store.is_empty());
/// ```
#[derive(Debug)]
pub struct InMemoryStoreBuilder {
    pub(crate) clock: Clock,
    pub(crate) initial_capacity: usize,
}

impl InMemoryStoreBuilder {
    /// Creates a new builder that evaluates expiry against `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            initial_capacity: 0,
        }
    }

    /// Sets the number of counters to pre-allocate room for.
    ///
    /// The store still grows beyond this size when needed. Each guard uses two counters.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builds the configured [`InMemoryStore`].
    #[must_use]
    pub fn build(self) -> InMemoryStore {
        InMemoryStore::from_builder(self)
    }
}
