// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `FailureGuard`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tick::{Clock, ClockControl};
use tripwire::{CounterKey, ErrorKind, FailureGuard, GuardConfig, Tripwire};
use tripwire_memory::InMemoryStore;
use tripwire_store::testing::{MockStore, StoreOp};

#[derive(Debug, Clone, PartialEq, Eq)]
struct WorkError(&'static str);

type Trips = Arc<Mutex<Vec<(u64, u64)>>>;

fn guard(tripwire: &Tripwire, identifier: &'static str, threshold: f64, minimum_checks: u64) -> (FailureGuard, Trips) {
    let trips = Trips::default();
    let guard = tripwire
        .guard(identifier)
        .failure_threshold(threshold)
        .minimum_checks(minimum_checks)
        .on_trip({
            let trips = Arc::clone(&trips);
            move |args| trips.lock().push((args.failed(), args.checked()))
        })
        .build();

    (guard, trips)
}

fn memory_tripwire() -> Tripwire {
    let tripwire = Tripwire::new();
    tripwire.enable(InMemoryStore::new(Clock::new_frozen()));
    tripwire
}

async fn succeed(guard: &FailureGuard, times: usize) {
    for _ in 0..times {
        let outcome = guard.check(|| async { Ok::<_, WorkError>(()) }).await.unwrap();
        assert_eq!(outcome, Ok(()));
    }
}

async fn fail(guard: &FailureGuard) {
    let outcome = guard.check(|| async { Err::<(), _>(WorkError("boom")) }).await.unwrap();
    assert_eq!(outcome, Err(WorkError("boom")));
}

#[tokio::test]
async fn trips_when_failure_reaches_threshold_at_minimum_checks() {
    let tripwire = memory_tripwire();
    let (guard, trips) = guard(&tripwire, "reference", 0.1, 10);

    succeed(&guard, 9).await;
    fail(&guard).await;

    assert_eq!(*trips.lock(), vec![(1, 10)]);

    let counts = guard.counts().await.unwrap();
    assert_eq!((counts.checked, counts.failed), (0, 0));

    succeed(&guard, 1).await;
    let counts = guard.counts().await.unwrap();
    assert_eq!((counts.checked, counts.failed), (1, 0));
}

#[tokio::test]
async fn does_not_trip_below_minimum_or_on_success() {
    let tripwire = memory_tripwire();
    let (guard, trips) = guard(&tripwire, "reference", 0.1, 10);

    succeed(&guard, 8).await;
    fail(&guard).await;
    assert!(trips.lock().is_empty());

    succeed(&guard, 1).await;
    assert!(trips.lock().is_empty());

    let counts = guard.counts().await.unwrap();
    assert_eq!((counts.checked, counts.failed), (10, 1));
}

#[tokio::test]
async fn never_trips_before_minimum_checks_even_when_everything_fails() {
    let tripwire = memory_tripwire();
    let (guard, trips) = guard(&tripwire, "all-failing", 0.5, 5);

    for _ in 0..4 {
        fail(&guard).await;
    }
    assert!(trips.lock().is_empty());

    fail(&guard).await;
    assert_eq!(*trips.lock(), vec![(5, 5)]);
}

#[tokio::test]
async fn evaluation_uses_checked_count_from_call_entry() {
    let tripwire = memory_tripwire();
    let (guard, trips) = guard(&tripwire, "snapshot", 0.5, 2);
    let racing = guard.clone();

    succeed(&guard, 1).await;

    // Another check starts while this one is running, so the store holds checked=3 when the
    // failure is recorded, but the decision uses checked=2 from this call's entry.
    let outcome = guard
        .check(|| async {
            racing.check(|| async { Ok::<_, WorkError>(()) }).await.unwrap().unwrap();
            Err::<(), _>(WorkError("boom"))
        })
        .await
        .unwrap();

    assert_eq!(outcome, Err(WorkError("boom")));
    assert_eq!(*trips.lock(), vec![(1, 2)]);
}

#[tokio::test]
async fn work_error_is_returned_unchanged() {
    let tripwire = memory_tripwire();
    let (guard, _) = guard(&tripwire, "passthrough", 0.5, 100);

    let outcome = guard
        .check(|| async { Err::<u8, _>(std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out")) })
        .await
        .unwrap();

    let error = outcome.unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::TimedOut);
    assert_eq!(error.to_string(), "upstream timed out");
}

#[tokio::test]
async fn work_value_is_returned_unchanged() {
    let tripwire = memory_tripwire();
    let (guard, _) = guard(&tripwire, "passthrough", 0.5, 100);

    let outcome = guard.check(|| async { Ok::<_, WorkError>(vec![1, 2, 3]) }).await.unwrap();

    assert_eq!(outcome, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn not_configured_fails_before_running_work() {
    let tripwire = Tripwire::new();
    let (guard, _) = guard(&tripwire, "unconfigured", 0.5, 1);
    let mut ran = false;

    let error = guard
        .check(|| {
            ran = true;
            async { Ok::<_, WorkError>(()) }
        })
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotConfigured);
    assert!(!ran);
    assert_eq!(guard.reset().await.unwrap_err().kind(), ErrorKind::NotConfigured);
    assert_eq!(guard.counts().await.unwrap_err().kind(), ErrorKind::NotConfigured);
}

#[tokio::test]
async fn unavailable_store_propagates_and_skips_work() {
    let store = MockStore::new();
    store.fail_when(|_| true);
    let tripwire = Tripwire::new();
    tripwire.enable(store);
    let (guard, _) = guard(&tripwire, "down", 0.5, 1);
    let mut ran = false;

    let error = guard
        .check(|| {
            ran = true;
            async { Ok::<_, WorkError>(()) }
        })
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Unavailable);
    assert!(!ran);
}

#[tokio::test]
async fn enabling_again_replaces_store_for_existing_guards() {
    let first = MockStore::new();
    let second = MockStore::new();
    let tripwire = Tripwire::new();
    let (guard, _) = guard(&tripwire, "swap", 0.5, 10);

    tripwire.enable(first.clone());
    succeed(&guard, 2).await;

    tripwire.enable(second.clone());
    succeed(&guard, 1).await;

    assert_eq!(first.value(guard.checked_key()), Some(2));
    assert_eq!(second.value(guard.checked_key()), Some(1));

    tripwire.disable();
    assert_eq!(guard.counts().await.unwrap_err().kind(), ErrorKind::NotConfigured);
}

#[tokio::test]
async fn guards_with_same_identifier_share_counters() {
    let tripwire = memory_tripwire();
    let (a, trips) = guard(&tripwire, "shared", 0.5, 4);
    let (b, _) = guard(&tripwire, "shared", 0.5, 4);

    succeed(&a, 2).await;
    fail(&b).await;
    fail(&a).await;

    assert_eq!(*trips.lock(), vec![(2, 4)]);
}

#[tokio::test]
async fn namespaces_isolate_counters() {
    let store = InMemoryStore::new(Clock::new_frozen());
    let east = Tripwire::new().with_namespace("east");
    let west = Tripwire::new().with_namespace("west");
    east.enable(store.clone());
    west.enable(store.clone());

    let (east_guard, _) = guard(&east, "db", 0.5, 10);
    let (west_guard, _) = guard(&west, "db", 0.5, 10);

    succeed(&east_guard, 3).await;
    succeed(&west_guard, 1).await;

    assert_eq!(east_guard.counts().await.unwrap().checked, 3);
    assert_eq!(west_guard.counts().await.unwrap().checked, 1);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn manual_reset_starts_new_window() {
    let tripwire = memory_tripwire();
    let (guard, trips) = guard(&tripwire, "manual", 0.5, 2);

    succeed(&guard, 1).await;
    guard.reset().await.unwrap();
    fail(&guard).await;

    assert!(trips.lock().is_empty());
    let counts = guard.counts().await.unwrap();
    assert_eq!((counts.checked, counts.failed), (1, 1));
}

#[tokio::test]
async fn idle_counters_expire_after_max_counter_age() {
    let control = ClockControl::new();
    let tripwire = Tripwire::new();
    tripwire.enable(InMemoryStore::new(control.to_clock()));
    let guard = tripwire
        .guard("idle")
        .failure_threshold(0.5)
        .minimum_checks(2)
        .max_counter_age(Duration::from_secs(60))
        .on_trip(|_| {})
        .build();

    fail(&guard).await;
    control.advance(Duration::from_secs(59));
    succeed(&guard, 1).await;

    control.advance(Duration::from_secs(59));
    let counts = guard.counts().await.unwrap();
    assert_eq!((counts.checked, counts.failed), (2, 1));

    control.advance(Duration::from_secs(1));
    let counts = guard.counts().await.unwrap();
    assert_eq!((counts.checked, counts.failed), (0, 0));
}

#[tokio::test]
async fn huge_counter_age_still_trips() {
    let tripwire = memory_tripwire();
    let trips = Trips::default();
    let config = GuardConfig::new(0.5).with_minimum_checks(2).with_max_counter_age_secs(u64::MAX);
    let guard = tripwire
        .guard("long-lived")
        .config(&config)
        .on_trip({
            let trips = Arc::clone(&trips);
            move |args| trips.lock().push((args.failed(), args.checked()))
        })
        .build();

    succeed(&guard, 1).await;
    assert_eq!(guard.counts().await.unwrap().checked, 1);

    fail(&guard).await;
    assert_eq!(*trips.lock(), vec![(1, 2)]);

    let huge = tripwire
        .guard("huge-duration")
        .failure_threshold(0.5)
        .max_counter_age(Duration::MAX)
        .on_trip(|_| {})
        .build();
    succeed(&huge, 1).await;
    assert_eq!(huge.counts().await.unwrap().checked, 1);
}

#[tokio::test]
async fn on_trip_runs_before_counters_are_reset() {
    let store = MockStore::new();
    let tripwire = Tripwire::new();
    tripwire.enable(store.clone());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let guard = tripwire
        .guard("ordered")
        .failure_threshold(0.5)
        .minimum_checks(2)
        .on_trip({
            let store = store.clone();
            let seen = Arc::clone(&seen);
            move |_| {
                let checked = CounterKey::from("tripwire:ordered:checked");
                let failed = CounterKey::from("tripwire:ordered:failed");
                seen.lock().push((store.value(&checked), store.value(&failed)));
            }
        })
        .build();

    succeed(&guard, 1).await;
    fail(&guard).await;

    assert_eq!(*seen.lock(), vec![(Some(2), Some(1))]);
    assert_eq!(store.value(guard.checked_key()), None);
    assert_eq!(store.value(guard.failed_key()), None);
}

#[tokio::test]
async fn check_refreshes_both_keys_with_counter_age() {
    let store = MockStore::new();
    let tripwire = Tripwire::new().with_namespace("svc");
    tripwire.enable(store.clone());
    let guard = tripwire
        .guard("orders")
        .failure_threshold(0.5)
        .max_counter_age(Duration::from_secs(120))
        .on_trip(|_| {})
        .build();

    succeed(&guard, 1).await;

    assert_eq!(
        store.operations(),
        vec![StoreOp::IncrementAndExpire {
            key: "svc:orders:checked".into(),
            expire: vec!["svc:orders:checked".into(), "svc:orders:failed".into()],
            ttl: Duration::from_secs(120),
        }]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checks_count_every_call() {
    const TASKS: u64 = 50;
    const CHECKS_PER_TASK: u64 = 20;

    let tripwire = memory_tripwire();
    let (guard, trips) = guard(&tripwire, "concurrent", 0.5, TASKS * CHECKS_PER_TASK + 1);

    let handles: Vec<_> = (0..TASKS)
        .map(|task| {
            let guard = guard.clone();
            tokio::spawn(async move {
                for i in 0..CHECKS_PER_TASK {
                    let fails = (task + i) % 4 == 0;
                    let _ = guard
                        .check(|| async move { if fails { Err(WorkError("boom")) } else { Ok(()) } })
                        .await
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let counts = guard.counts().await.unwrap();
    assert_eq!(counts.checked, TASKS * CHECKS_PER_TASK);
    assert_eq!(counts.failed, TASKS * CHECKS_PER_TASK / 4);
    assert!(counts.checked >= counts.failed);
    assert!(trips.lock().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_failures_trip_at_least_once() {
    let tripwire = memory_tripwire();
    let (guard, trips) = guard(&tripwire, "storm", 0.5, 10);

    let handles: Vec<_> = (0..40)
        .map(|_| {
            let guard = guard.clone();
            tokio::spawn(async move {
                let _ = guard.check(|| async { Err::<(), _>(WorkError("boom")) }).await.unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let trips = trips.lock();
    assert!(!trips.is_empty());
    for (failed, checked) in trips.iter() {
        assert!(*checked >= 10);
        assert!(failed * 2 >= *checked);
    }
}
