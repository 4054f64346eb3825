// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock counter store for testing.
//!
//! This module provides `MockStore`, an in-memory counter store that records all
//! operations and supports failure injection for testing error paths.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{CounterKey, CounterStore, Error};

/// Recorded counter store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// An increment was performed on the given key.
    Increment(CounterKey),
    /// A read was performed on the given key.
    Get(CounterKey),
    /// The time-to-live of the given key was refreshed.
    Expire {
        /// The key whose time-to-live was refreshed.
        key: CounterKey,
        /// The requested time-to-live.
        ttl: Duration,
    },
    /// The given key was deleted.
    Delete(CounterKey),
    /// A batched increment with time-to-live refresh was performed.
    IncrementAndExpire {
        /// The incremented key.
        key: CounterKey,
        /// The keys whose time-to-live was refreshed.
        expire: Vec<CounterKey>,
        /// The requested time-to-live.
        ttl: Duration,
    },
    /// A batched delete was performed.
    DeleteAll(Vec<CounterKey>),
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

/// A configurable mock counter store for testing.
///
/// Counters are kept in memory without expiration; time-to-live requests are only
/// recorded. Operations can be configured to fail on demand, and every operation is
/// recorded for later verification. Clones share state.
///
/// # Examples
///
/// ```
/// use tripwire_store::testing::{MockStore, StoreOp};
/// use tripwire_store::{CounterKey, CounterStore};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
/// let key = CounterKey::from("checked");
///
/// assert_eq!(store.increment(&key).await.unwrap(), 1);
/// assert_eq!(store.operations(), vec![StoreOp::Increment(key.clone())]);
///
/// // Fail every delete
/// store.fail_when(|op| matches!(op, StoreOp::Delete(_)));
/// assert!(store.delete(&key).await.is_err());
/// # });
/// ```
pub struct MockStore {
    data: Arc<Mutex<HashMap<CounterKey, u64>>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl Clone for MockStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the current value of a counter without recording an operation.
    #[must_use]
    pub fn value(&self, key: &CounterKey) -> Option<u64> {
        self.data.lock().get(key).copied()
    }

    /// Returns true if the store holds the given key.
    #[must_use]
    pub fn contains_key(&self, key: &CounterKey) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// Failed operations are still recorded but leave the counters untouched.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn begin(&self, op: StoreOp) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);

        if fail {
            return Err(Error::unavailable("mock: operation failed"));
        }

        Ok(())
    }

    fn bump(&self, key: &CounterKey) -> u64 {
        let mut data = self.data.lock();
        let value = data.entry(key.clone()).or_insert(0);
        *value = value.saturating_add(1);
        *value
    }
}

impl CounterStore for MockStore {
    async fn increment(&self, key: &CounterKey) -> Result<u64, Error> {
        self.begin(StoreOp::Increment(key.clone()))?;
        Ok(self.bump(key))
    }

    async fn get(&self, key: &CounterKey) -> Result<u64, Error> {
        self.begin(StoreOp::Get(key.clone()))?;
        Ok(self.value(key).unwrap_or_default())
    }

    async fn expire(&self, key: &CounterKey, ttl: Duration) -> Result<(), Error> {
        self.begin(StoreOp::Expire { key: key.clone(), ttl })
    }

    async fn delete(&self, key: &CounterKey) -> Result<(), Error> {
        self.begin(StoreOp::Delete(key.clone()))?;
        self.data.lock().remove(key);
        Ok(())
    }

    async fn increment_and_expire(&self, key: &CounterKey, expire: &[CounterKey], ttl: Duration) -> Result<u64, Error> {
        self.begin(StoreOp::IncrementAndExpire {
            key: key.clone(),
            expire: expire.to_vec(),
            ttl,
        })?;
        Ok(self.bump(key))
    }

    async fn delete_all(&self, keys: &[CounterKey]) -> Result<(), Error> {
        self.begin(StoreOp::DeleteAll(keys.to_vec()))?;
        let mut data = self.data.lock();
        for key in keys {
            data.remove(key);
        }
        Ok(())
    }
}
