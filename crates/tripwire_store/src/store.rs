// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for counter storage backends.
//!
//! [`CounterStore`] defines the four counter verbs a guard needs plus two batched forms
//! that remote backends can serve in a single round trip.

use std::time::Duration;

use crate::{CounterKey, Error};

/// Trait for atomic counter backends.
///
/// Every operation may suspend on I/O. Implementations must make [`increment`][Self::increment]
/// atomic with respect to concurrent callers; no other concurrency guarantee is required.
///
/// All methods are required. The batched forms must be functionally identical to issuing
/// their single-key counterparts in order:
/// - `increment_and_expire(key, expire, ttl)` equals `increment(key)` followed by
///   `expire(k, ttl)` for every `k` in `expire`
/// - `delete_all(keys)` equals `delete(k)` for every `k` in `keys`
#[cfg_attr(
    any(test, feature = "dynamic-store"),
    dynosaur::dynosaur(pub(crate) DynCounterStore = dyn(box) CounterStore, bridge(none))
)]
pub trait CounterStore: Send + Sync {
    /// Increments the counter and returns the new value.
    ///
    /// An absent key is created at zero first, so the returned value is at least one.
    fn increment(&self, key: &CounterKey) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Reads the current value of the counter. Absent or expired counters read as zero.
    fn get(&self, key: &CounterKey) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Sets or refreshes the time-to-live of the counter without touching its value.
    ///
    /// Refreshing an absent key is a no-op.
    fn expire(&self, key: &CounterKey, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes the counter. A subsequent increment starts again from zero.
    fn delete(&self, key: &CounterKey) -> impl Future<Output = Result<(), Error>> + Send;

    /// Increments `key` and refreshes the time-to-live of every key in `expire`.
    ///
    /// Returns the incremented value of `key`.
    fn increment_and_expire(&self, key: &CounterKey, expire: &[CounterKey], ttl: Duration) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Removes every key in `keys`.
    fn delete_all(&self, keys: &[CounterKey]) -> impl Future<Output = Result<(), Error>> + Send;
}
