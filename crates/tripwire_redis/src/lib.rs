// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Redis-backed counter store for tripwire guards.
//!
//! [`RedisStore`] implements [`CounterStore`][tripwire_store::CounterStore] on top of a
//! [`RedisPool`], a bounded set of multiplexed connections that are opened on demand and
//! handed back to the pool when an operation finishes.
//!
//! # Quick Start
//!
//! ```no_run
//! use tripwire_redis::RedisStore;
//! use tripwire_store::{CounterKey, CounterStore};
//!
//! # async fn example() -> Result<(), tripwire_store::Error> {
//! let store = RedisStore::open("redis://127.0.0.1/")?;
//! let checked = store.increment(&CounterKey::from("tripwire:db:checked")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Commands
//!
//! | Operation | Redis |
//! |---|---|
//! | `increment` | `INCR` |
//! | `get` | `GET` |
//! | `expire` | `EXPIRE`, in whole seconds rounded up |
//! | `delete` | `DEL` |
//! | `increment_and_expire` | `MULTI`, `INCR`, `EXPIRE`..., `EXEC` |
//! | `delete_all` | `MULTI`, `DEL`..., `EXEC` |
//!
//! Every Redis failure surfaces as [`ErrorKind::Unavailable`][tripwire_store::ErrorKind::Unavailable]
//! with the Redis error attached as its cause.

mod config;
mod pool;
mod store;

#[doc(inline)]
pub use config::RedisStoreConfig;
#[doc(inline)]
pub use pool::{DEFAULT_MAX_CONNECTIONS, PooledConnection, RedisPool};
#[doc(inline)]
pub use store::RedisStore;
