// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Failure guards and their builder.

mod args;
mod builder;
mod callbacks;
pub(crate) mod constants;
mod decision;
mod failure_guard;

pub use args::OnTripArgs;
pub use builder::FailureGuardBuilder;
pub(crate) use callbacks::OnTrip;
pub use failure_guard::{Counts, FailureGuard};
