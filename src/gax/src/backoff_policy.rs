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

//! The delay between attempts of a retry loop.
//!
//! [ExponentialBackoff][crate::exponential_backoff::ExponentialBackoff] is
//! the only implementation in this crate, and the default for all clients.

use std::time::{Duration, Instant};

/// Computes how long the retry loop sleeps after a failed attempt.
pub trait BackoffPolicy: Send + Sync + std::fmt::Debug {
    /// The delay before attempt number `attempt_count + 1`.
    ///
    /// `attempt_count` includes the attempt that just failed, it is never
    /// zero.
    fn on_failure(&self, loop_start: Instant, attempt_count: u32) -> Duration;
}

crate::macros::policy_arg! {
    /// A [BackoffPolicy] in the form taken by client and request options.
    BackoffPolicyArg => BackoffPolicy
}
