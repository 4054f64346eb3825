// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dynamic counter store wrapper for type erasure.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::store::DynCounterStore;
use crate::{CounterKey, CounterStore, Error};

/// Extension trait for converting any `CounterStore` into a `DynamicStore`.
///
/// This trait is automatically implemented for all types that implement `CounterStore`.
///
/// # Examples
///
/// ```
/// use tripwire_store::{CounterStore, DynamicStore, DynamicStoreExt};
///
/// fn erase<T>(store: T) -> DynamicStore
/// where
///     T: CounterStore + 'static,
/// {
///     store.into_dynamic()
/// }
/// ```
pub trait DynamicStoreExt: Sized {
    /// Converts this counter store into a `DynamicStore`.
    fn into_dynamic(self) -> DynamicStore;
}

impl<T> DynamicStoreExt for T
where
    T: CounterStore + 'static,
{
    fn into_dynamic(self) -> DynamicStore {
        DynamicStore::new(self)
    }
}

/// A clonable counter store with type erasure.
///
/// `DynamicStore` wraps a trait object in an `Arc`, so clones share the same backend.
pub struct DynamicStore(Arc<DynCounterStore<'static>>);

impl DynamicStore {
    /// Creates a new dynamic store from any `CounterStore` implementation.
    pub(crate) fn new<T>(store: T) -> Self
    where
        T: CounterStore + 'static,
    {
        Self(DynCounterStore::new_arc(store))
    }
}

impl Debug for DynamicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicStore").finish()
    }
}

impl Clone for DynamicStore {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl CounterStore for DynamicStore {
    async fn increment(&self, key: &CounterKey) -> Result<u64, Error> {
        self.0.increment(key).await
    }

    async fn get(&self, key: &CounterKey) -> Result<u64, Error> {
        self.0.get(key).await
    }

    async fn expire(&self, key: &CounterKey, ttl: Duration) -> Result<(), Error> {
        self.0.expire(key, ttl).await
    }

    async fn delete(&self, key: &CounterKey) -> Result<(), Error> {
        self.0.delete(key).await
    }

    async fn increment_and_expire(&self, key: &CounterKey, expire: &[CounterKey], ttl: Duration) -> Result<u64, Error> {
        self.0.increment_and_expire(key, expire, ttl).await
    }

    async fn delete_all(&self, keys: &[CounterKey]) -> Result<(), Error> {
        self.0.delete_all(keys).await
    }
}
