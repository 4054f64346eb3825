// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builds guards from JSON settings.

use std::collections::HashMap;

use tripwire::{GuardConfig, Tripwire};

const SETTINGS: &str = r#"{
    "payments": { "failure_threshold": 0.05, "minimum_checks": 500 },
    "search": { "failure_threshold": 0.25, "max_counter_age_secs": 86400 }
}"#;

fn main() -> Result<(), serde_json::Error> {
    let settings: HashMap<String, GuardConfig> = serde_json::from_str(SETTINGS)?;
    let tripwire = Tripwire::new().with_namespace("shop");

    for (name, config) in settings {
        let guard = tripwire.guard(name).config(&config).on_trip(|_| {}).build();

        println!(
            "{}: threshold {}, minimum {} checks, counters kept {:?}",
            guard.checked_key(),
            guard.failure_threshold(),
            guard.minimum_checks(),
            guard.max_counter_age()
        );
    }

    Ok(())
}
