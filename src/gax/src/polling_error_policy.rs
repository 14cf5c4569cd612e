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

//! Decide which errors stop a polling loop, and how long a job may run.
//!
//! Polling a job's status is always idempotent, so these policies only
//! look at the error. They are also told about queries that succeed while
//! the job is still running, which lets them bound the loop even when no
//! query ever fails.
//!
//! ```
//! # use cloudkit_gax::polling_error_policy::*;
//! use std::time::Duration;
//! let policy = Aip194Strict
//!     .with_time_limit(Duration::from_secs(15 * 60))
//!     .with_attempt_limit(50);
//! ```

use crate::error::Error;
use crate::retry_result::RetryResult;
use std::time::{Duration, Instant};

/// Classifies the outcome of each query in a polling loop.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Called when a query fails. `attempt_count` includes this query.
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> RetryResult;

    /// Called when a query succeeds and `name` is still running.
    ///
    /// Returning an error ends the loop with that error.
    fn on_in_progress(&self, _loop_start: Instant, _attempt_count: u32, _name: &str) -> Option<Error> {
        None
    }
}

crate::macros::policy_arg! {
    /// A [PollingErrorPolicy] in the form taken by client and request
    /// options.
    PollingErrorPolicyArg => PollingErrorPolicy
}

/// Adds limits to any [PollingErrorPolicy].
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Stops the loop once it has run for `maximum_duration`.
    fn with_time_limit(self, maximum_duration: Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Stops the loop after `maximum_attempts` queries.
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// Continues after I/O errors, HTTP 503, and transient credential errors.
///
/// Follows [AIP-194]. Has no limits of its own.
///
/// [AIP-194]: https://google.aip.dev/194
#[derive(Clone, Debug)]
pub struct Aip194Strict;

impl PollingErrorPolicy for Aip194Strict {
    fn on_error(&self, _loop_start: Instant, _attempt_count: u32, error: Error) -> RetryResult {
        let transient = error.is_transient_and_before_rpc()
            || error.is_io()
            || error.http_status_code() == Some(503);
        if transient {
            RetryResult::Continue(error)
        } else {
            RetryResult::Permanent(error)
        }
    }
}

/// Continues after any error. Combine with a limit.
#[derive(Clone, Debug)]
pub struct AlwaysContinue;

impl PollingErrorPolicy for AlwaysContinue {
    fn on_error(&self, _: Instant, _: u32, error: Error) -> RetryResult {
        RetryResult::Continue(error)
    }
}

/// Caps the wall-clock time of the polling loop.
#[derive(Debug)]
pub struct LimitedElapsedTime<P = Aip194Strict> {
    inner: P,
    maximum_duration: Duration,
}

impl LimitedElapsedTime {
    /// Limits [Aip194Strict] to `maximum_duration`.
    pub fn new(maximum_duration: Duration) -> Self {
        Self::custom(Aip194Strict, maximum_duration)
    }
}

impl<P: PollingErrorPolicy> LimitedElapsedTime<P> {
    pub fn custom(inner: P, maximum_duration: Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }
}

impl<P: PollingErrorPolicy> PollingErrorPolicy for LimitedElapsedTime<P> {
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> RetryResult {
        let elapsed = loop_start.elapsed();
        self.inner
            .on_error(loop_start, attempt_count, error)
            .exhaust_if(elapsed >= self.maximum_duration)
    }

    fn on_in_progress(&self, loop_start: Instant, attempt_count: u32, name: &str) -> Option<Error> {
        if let Some(e) = self.inner.on_in_progress(loop_start, attempt_count, name) {
            return Some(e);
        }
        let elapsed = loop_start.elapsed();
        (elapsed >= self.maximum_duration).then(|| {
            Error::exhausted(LimitReached::ElapsedTime {
                name: name.to_string(),
                elapsed,
                limit: self.maximum_duration,
            })
        })
    }
}

/// Caps the number of queries in the polling loop.
#[derive(Debug)]
pub struct LimitedAttemptCount<P = Aip194Strict> {
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Limits [Aip194Strict] to `maximum_attempts`.
    pub fn new(maximum_attempts: u32) -> Self {
        Self::custom(Aip194Strict, maximum_attempts)
    }
}

impl<P: PollingErrorPolicy> LimitedAttemptCount<P> {
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }
}

impl<P: PollingErrorPolicy> PollingErrorPolicy for LimitedAttemptCount<P> {
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> RetryResult {
        self.inner
            .on_error(loop_start, attempt_count, error)
            .exhaust_if(attempt_count >= self.maximum_attempts)
    }

    fn on_in_progress(&self, loop_start: Instant, attempt_count: u32, name: &str) -> Option<Error> {
        if let Some(e) = self.inner.on_in_progress(loop_start, attempt_count, name) {
            return Some(e);
        }
        (attempt_count >= self.maximum_attempts).then(|| {
            Error::exhausted(LimitReached::AttemptCount {
                name: name.to_string(),
                count: attempt_count,
                limit: self.maximum_attempts,
            })
        })
    }
}

/// The source of [Error]s returned when a job outlives a polling limit.
#[derive(Debug, thiserror::Error)]
pub enum LimitReached {
    #[error("{name} still running after {elapsed:?}, the polling time limit is {limit:?}")]
    ElapsedTime {
        name: String,
        elapsed: Duration,
        limit: Duration,
    },
    #[error("{name} still running after {count} queries, the polling attempt limit is {limit}")]
    AttemptCount { name: String, count: u32, limit: u32 },
}
