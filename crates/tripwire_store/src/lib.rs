// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Atomic counter store abstractions for failure-threshold guards.
//!
//! This crate defines the [`CounterStore`] trait that every counter backend must satisfy,
//! along with [`CounterKey`] for naming counters and [`Error`] for fallible operations.
//!
//! # Overview
//!
//! A counter store is the only shared state a guard relies on. It must increment a named
//! counter atomically, read it, refresh its time-to-live and delete it. Implement
//! [`CounterStore`] for your backend, then hand it to the `tripwire` context.
//!
//! Two batched operations, [`increment_and_expire`][CounterStore::increment_and_expire] and
//! [`delete_all`][CounterStore::delete_all], exist so that remote backends can issue the
//! guard's hot path in a single round trip. They must behave exactly like the equivalent
//! sequence of single-key operations.
//!
//! # Implementing a Counter Store
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//! use std::time::Duration;
//!
//! use tripwire_store::{CounterKey, CounterStore, Error};
//!
//! #[derive(Default)]
//! struct SimpleStore(Mutex<HashMap<CounterKey, u64>>);
//!
//! impl CounterStore for SimpleStore {
//!     async fn increment(&self, key: &CounterKey) -> Result<u64, Error> {
//!         let mut map = self.0.lock().unwrap();
//!         let value = map.entry(key.clone()).or_default();
//!         *value += 1;
//!         Ok(*value)
//!     }
//!
//!     async fn get(&self, key: &CounterKey) -> Result<u64, Error> {
//!         Ok(self.0.lock().unwrap().get(key).copied().unwrap_or_default())
//!     }
//!
//!     async fn expire(&self, _key: &CounterKey, _ttl: Duration) -> Result<(), Error> {
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, key: &CounterKey) -> Result<(), Error> {
//!         self.0.lock().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn increment_and_expire(&self, key: &CounterKey, _expire: &[CounterKey], _ttl: Duration) -> Result<u64, Error> {
//!         self.increment(key).await
//!     }
//!
//!     async fn delete_all(&self, keys: &[CounterKey]) -> Result<(), Error> {
//!         let mut map = self.0.lock().unwrap();
//!         for key in keys {
//!             map.remove(key);
//!         }
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! Enable the `dynamic-store` feature (on by default) for [`DynamicStore`], which wraps any
//! `CounterStore` in a clonable, type-erased container. The guard context uses it so that the
//! configured backend can be replaced at runtime.

mod key;
pub(crate) mod store;

pub mod error;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[cfg(any(test, feature = "dynamic-store"))]
mod dynamic;

#[cfg(any(test, feature = "dynamic-store"))]
#[doc(inline)]
pub use dynamic::{DynamicStore, DynamicStoreExt};
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use key::CounterKey;
#[doc(inline)]
pub use store::CounterStore;
