// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reports guard trips as log events and OpenTelemetry metrics.

use opentelemetry_sdk::metrics::{InMemoryMetricExporter, SdkMeterProvider};
use tick::Clock;
use tripwire::Tripwire;
use tripwire_memory::InMemoryStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let exporter = InMemoryMetricExporter::default();
    let meter_provider = SdkMeterProvider::builder().with_periodic_exporter(exporter.clone()).build();

    let tripwire = Tripwire::new().enable_logs().enable_metrics(&meter_provider);
    tripwire.enable(InMemoryStore::new(Clock::new_frozen()));

    let guard = tripwire
        .guard("checkout")
        .failure_threshold(0.5)
        .minimum_checks(4)
        .on_trip(|_| {})
        .build();

    for call in 0..8 {
        let _ = guard.check(|| async move { if call % 2 == 0 { Err("declined") } else { Ok(()) } }).await?;
    }

    meter_provider.force_flush()?;
    for metrics in exporter.get_finished_metrics()? {
        println!("{metrics:?}");
    }

    Ok(())
}
