// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Guards a flaky operation with an in-memory counter store and prints when it trips.

use std::sync::atomic::{AtomicU64, Ordering};

use tick::Clock;
use tripwire::Tripwire;
use tripwire_memory::InMemoryStore;

#[derive(Debug)]
struct LookupError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), tripwire::Error> {
    let tripwire = Tripwire::new();
    tripwire.enable(InMemoryStore::new(Clock::new_frozen()));

    let guard = tripwire
        .guard("user_lookup")
        .failure_threshold(0.2)
        .minimum_checks(20)
        .on_trip(|args| {
            println!(
                "{} tripped: {} of {} checks failed ({:.0}%)",
                args.identifier(),
                args.failed(),
                args.checked(),
                args.failure_rate() * 100.0
            );
        })
        .build();

    let calls = AtomicU64::new(0);

    for _ in 0..100 {
        let call = calls.fetch_add(1, Ordering::Relaxed);
        let outcome = guard
            .check(|| async move { if call % 3 == 0 { Err(LookupError) } else { Ok(call) } })
            .await?;

        if let Err(error) = outcome {
            println!("call {call} failed: {error:?}");
        }
    }

    let counts = guard.counts().await?;
    println!("current window: {} checked, {} failed", counts.checked, counts.failed);

    Ok(())
}
