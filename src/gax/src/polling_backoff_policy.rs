// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The delay between queries of a polling loop.
//!
//! Polling loops wait after every query that reports the job as still
//! running. Errors while polling use the retry backoff instead.

use std::time::{Duration, Instant};

/// Computes how long the polling loop sleeps before the next query.
pub trait PollingBackoffPolicy: Send + Sync + std::fmt::Debug {
    /// The delay after `attempt_count` queries, always at least one.
    fn wait_period(&self, loop_start: Instant, attempt_count: u32) -> Duration;
}

crate::macros::policy_arg! {
    /// A [PollingBackoffPolicy] in the form taken by client and request
    /// options.
    PollingBackoffPolicyArg => PollingBackoffPolicy
}
