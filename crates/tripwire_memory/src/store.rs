// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory counter store implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tick::Clock;
use tripwire_store::{CounterKey, CounterStore, Error};

use crate::builder::InMemoryStoreBuilder;

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: u64,
    deadline: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }
}

#[derive(Debug)]
struct Counters {
    clock: Clock,
    entries: Mutex<HashMap<CounterKey, Entry>>,
}

/// A process-local counter store.
///
/// Every operation takes a single lock, which makes [`increment`][CounterStore::increment]
/// atomic and lets the batched operations apply all of their keys together. Expired counters
/// are dropped lazily when they are next touched. Clones share the same counters.
///
/// # Examples
///
/// ```
/// use tick::Clock;
/// use tripwire_memory::InMemoryStore;
/// use tripwire_store::{CounterKey, CounterStore};
///
/// # futures::executor::block_on(async {
/// let store = InMemoryStore::new(Clock::new_frozen());
/// let key = CounterKey::from("k");
///
/// store.increment(&key).await.unwrap();
/// assert_eq!(store.increment(&key).await.unwrap(), 2);
///
/// store.delete(&key).await.unwrap();
/// assert_eq!(store.get(&key).await.unwrap(), 0);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    inner: Arc<Counters>,
}

impl InMemoryStore {
    /// Creates an empty store that evaluates expiry against `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::builder(clock).build()
    }

    /// Creates a new builder for configuring an in-memory store.
    #[must_use]
    pub fn builder(clock: Clock) -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::new(clock)
    }

    pub(crate) fn from_builder(builder: InMemoryStoreBuilder) -> Self {
        Self {
            inner: Arc::new(Counters {
                clock: builder.clock,
                entries: Mutex::new(HashMap::with_capacity(builder.initial_capacity)),
            }),
        }
    }

    /// Returns the number of live counters.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = self.inner.clock.instant();
        self.inner.entries.lock().values().filter(|entry| !entry.is_expired(now)).count()
    }

    /// Returns true if no live counters are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired counter and returns how many were removed.
    ///
    /// Expired counters are already invisible to readers; this only reclaims their memory.
    pub fn purge_expired(&self) -> usize {
        let now = self.inner.clock.instant();
        let mut entries = self.inner.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    fn live<'a>(entries: &'a mut HashMap<CounterKey, Entry>, key: &CounterKey, now: Instant) -> Option<&'a mut Entry> {
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }

        entries.get_mut(key)
    }

    fn bump(entries: &mut HashMap<CounterKey, Entry>, key: &CounterKey, now: Instant) -> u64 {
        match Self::live(entries, key, now) {
            Some(entry) => {
                entry.value = entry.value.saturating_add(1);
                entry.value
            }
            None => {
                entries.insert(key.clone(), Entry { value: 1, deadline: None });
                1
            }
        }
    }

    fn refresh(entries: &mut HashMap<CounterKey, Entry>, key: &CounterKey, ttl: Duration, now: Instant) {
        if let Some(entry) = Self::live(entries, key, now) {
            // A deadline past the clock's range never arrives.
            entry.deadline = now.checked_add(ttl);
        }
    }
}

impl CounterStore for InMemoryStore {
    async fn increment(&self, key: &CounterKey) -> Result<u64, Error> {
        let now = self.inner.clock.instant();
        Ok(Self::bump(&mut self.inner.entries.lock(), key, now))
    }

    async fn get(&self, key: &CounterKey) -> Result<u64, Error> {
        let now = self.inner.clock.instant();
        Ok(Self::live(&mut self.inner.entries.lock(), key, now).map_or(0, |entry| entry.value))
    }

    async fn expire(&self, key: &CounterKey, ttl: Duration) -> Result<(), Error> {
        let now = self.inner.clock.instant();
        Self::refresh(&mut self.inner.entries.lock(), key, ttl, now);
        Ok(())
    }

    async fn delete(&self, key: &CounterKey) -> Result<(), Error> {
        self.inner.entries.lock().remove(key);
        Ok(())
    }

    async fn increment_and_expire(&self, key: &CounterKey, expire: &[CounterKey], ttl: Duration) -> Result<u64, Error> {
        let now = self.inner.clock.instant();
        let mut entries = self.inner.entries.lock();
        let value = Self::bump(&mut entries, key, now);
        for expiring in expire {
            Self::refresh(&mut entries, expiring, ttl, now);
        }
        Ok(value)
    }

    async fn delete_all(&self, keys: &[CounterKey]) -> Result<(), Error> {
        let mut entries = self.inner.entries.lock();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
