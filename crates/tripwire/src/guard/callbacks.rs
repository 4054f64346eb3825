// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::OnTripArgs;

crate::utils::define_fn_wrapper!(OnTrip(Fn(OnTripArgs<'_>)));
