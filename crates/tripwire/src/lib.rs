// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Failure-threshold guards that report sustained failure across processes.
//!
//! A [`FailureGuard`] wraps calls to an operation, counts how many calls were made and how many
//! failed, and invokes a callback once the failure ratio reaches a threshold after a minimum
//! number of calls. The counters then reset and the guard starts over. The guard only detects and
//! reports; it never blocks calls, so it composes with whatever reaction the caller chooses.
//!
//! Counters live in a [`CounterStore`] installed on a [`Tripwire`] context. With a shared store
//! such as `tripwire_redis`, every process guarding the same operation contributes to one pair of
//! counters.
//!
//! # Quick Start
//!
//! ```
//! use tick::Clock;
//! use tripwire::Tripwire;
//! use tripwire_memory::InMemoryStore;
//!
//! # futures::executor::block_on(async {
//! let tripwire = Tripwire::new();
//! tripwire.enable(InMemoryStore::new(Clock::new_frozen()));
//!
//! let guard = tripwire
//!     .guard("ledger")
//!     .failure_threshold(0.1)
//!     .minimum_checks(10)
//!     .on_trip(|args| eprintln!("ledger failing: {} of {}", args.failed(), args.checked()))
//!     .build();
//!
//! let balance = guard.check(|| async { Ok::<_, std::io::Error>(42) }).await?;
//! assert_eq!(balance.unwrap(), 42);
//! # Ok::<(), tripwire::Error>(())
//! # }).unwrap();
//! ```
//!
//! # Counting
//!
//! Each call to [`check`][FailureGuard::check]:
//!
//! 1. increments `<namespace>:<identifier>:checked` and refreshes the expiry of both counters;
//! 2. runs the work;
//! 3. on failure, increments `<namespace>:<identifier>:failed` and trips if the checked count
//!    from step 1 is at least `minimum_checks` and `failed / checked` is at least
//!    `failure_threshold`.
//!
//! Success never evaluates the threshold. The work's own result is returned unchanged inside
//! the outer `Result`, which carries counter store errors.
//!
//! # Concurrency
//!
//! Guards hold no local state; atomic increments in the store are the only synchronization.
//! Concurrent failures can each observe the same breach, so the trip callback is delivered at
//! least once per breach and should be idempotent. A reset that races with an in-flight check
//! may drop that check from the next window.
//!
//! # Store Errors
//!
//! Guards do not fail open. Without a store every operation returns
//! [`ErrorKind::NotConfigured`] before any I/O, and store failures are returned as
//! [`ErrorKind::Unavailable`].
//!
//! # Features
//!
//! - `logs`: emits `tracing` events on trips and resets, see [`telemetry`].
//! - `metrics`: reports an OpenTelemetry `tripwire.event` counter, see [`telemetry`].
//! - `serde`: makes [`GuardConfig`] serializable.

mod config;
mod context;
mod guard;
pub mod telemetry;
mod utils;

pub use config::GuardConfig;
pub use context::Tripwire;
pub use guard::{Counts, FailureGuard, FailureGuardBuilder, OnTripArgs};
#[doc(inline)]
pub use tripwire_store::{CounterKey, CounterStore, DynamicStore, Error, ErrorKind};

/// A flag indicating that the required property is set.
#[non_exhaustive]
#[derive(Debug)]
#[doc(hidden)]
pub struct Set;

/// A flag indicating that the required property has not been set.
#[non_exhaustive]
#[derive(Debug)]
#[doc(hidden)]
pub struct NotSet;
