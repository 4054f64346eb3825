// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Process-local counter store with time-to-live support.
//!
//! This crate provides [`InMemoryStore`], a [`CounterStore`][tripwire_store::CounterStore]
//! that keeps counters in memory. Expiry is evaluated against a [`tick::Clock`], which lets
//! tests move time forward without sleeping. Use [`InMemoryStoreBuilder`] to pre-size the
//! underlying map.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use tick::ClockControl;
//! use tripwire_memory::InMemoryStore;
//! use tripwire_store::{CounterKey, CounterStore};
//!
//! # futures::executor::block_on(async {
//! let control = ClockControl::new();
//! let store = InMemoryStore::new(control.to_clock());
//! let key = CounterKey::from("requests");
//!
//! store.increment(&key).await.unwrap();
//! store.expire(&key, Duration::from_secs(10)).await.unwrap();
//! assert_eq!(store.get(&key).await.unwrap(), 1);
//!
//! control.advance(Duration::from_secs(10));
//! assert_eq!(store.get(&key).await.unwrap(), 0);
//! # });
//! ```
//!
//! Counters live only as long as the process. Guards running in several processes need a
//! shared backend such as `tripwire_redis`.

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::InMemoryStoreBuilder;
#[doc(inline)]
pub use store::InMemoryStore;
