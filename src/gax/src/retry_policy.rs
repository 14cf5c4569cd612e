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

//! Decide which errors are retried, and for how long.
//!
//! Clients retry a failed request when the error is transient and the request
//! is idempotent. Each service crate ships a policy tuned to the errors that
//! service reports as transient, the policies here are the generic building
//! blocks.
//!
//! Policies compose through [RetryPolicyExt]:
//!
//! ```
//! # use cloudkit_gax::retry_policy::*;
//! use std::time::Duration;
//! let policy = Aip194Strict
//!     .with_time_limit(Duration::from_secs(60))
//!     .with_attempt_limit(5);
//! ```

use crate::error::Error;
use crate::retry_result::RetryResult;
use std::time::{Duration, Instant};

/// Classifies the errors seen by a retry loop.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Called after each failed attempt.
    ///
    /// `attempt_count` includes the attempt that produced `error`.
    /// `idempotent` is true when the request is safe to send more than once.
    fn on_error(
        &self,
        loop_start: Instant,
        attempt_count: u32,
        idempotent: bool,
        error: Error,
    ) -> RetryResult;

    /// How long the loop may still run, if the policy has a time budget.
    ///
    /// The retry loop caps each attempt's timeout, and each backoff sleep,
    /// with this value.
    fn remaining_time(&self, _loop_start: Instant, _attempt_count: u32) -> Option<Duration> {
        None
    }
}

crate::macros::policy_arg! {
    /// A [RetryPolicy] in the form taken by client and request options.
    RetryPolicyArg => RetryPolicy
}

/// Adds limits to any [RetryPolicy].
pub trait RetryPolicyExt: RetryPolicy + Sized {
    /// Stops retrying once the loop has run for `maximum_duration`, backoff
    /// included.
    fn with_time_limit(self, maximum_duration: Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Stops retrying after `maximum_attempts` attempts, counting the first.
    ///
    /// A limit of one disables retries.
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: RetryPolicy> RetryPolicyExt for T {}

/// Retries only what [AIP-194] considers safe.
///
/// Idempotent requests are retried on I/O errors and HTTP 503. Transient
/// credential errors are retried for any request, nothing was sent. The
/// policy has no limits of its own.
///
/// [AIP-194]: https://google.aip.dev/194
#[derive(Clone, Debug)]
pub struct Aip194Strict;

impl RetryPolicy for Aip194Strict {
    fn on_error(
        &self,
        _loop_start: Instant,
        _attempt_count: u32,
        idempotent: bool,
        error: Error,
    ) -> RetryResult {
        let retryable = error.is_transient_and_before_rpc()
            || (idempotent && (error.is_io() || error.http_status_code() == Some(503)));
        if retryable {
            RetryResult::Continue(error)
        } else {
            RetryResult::Permanent(error)
        }
    }
}

/// Retries every error. Combine with a limit.
#[derive(Clone, Debug)]
pub struct AlwaysRetry;

impl RetryPolicy for AlwaysRetry {
    fn on_error(&self, _: Instant, _: u32, _: bool, error: Error) -> RetryResult {
        RetryResult::Continue(error)
    }
}

/// Returns the first error.
#[derive(Clone, Debug)]
pub struct NeverRetry;

impl RetryPolicy for NeverRetry {
    fn on_error(&self, _: Instant, _: u32, _: bool, error: Error) -> RetryResult {
        RetryResult::Exhausted(error)
    }
}

/// Caps the wall-clock time of the loop around an inner policy.
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

impl<P: RetryPolicy> LimitedElapsedTime<P> {
    pub fn custom(inner: P, maximum_duration: Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    fn deadline(&self, loop_start: Instant) -> Instant {
        loop_start + self.maximum_duration
    }
}

impl<P: RetryPolicy> RetryPolicy for LimitedElapsedTime<P> {
    fn on_error(
        &self,
        loop_start: Instant,
        attempt_count: u32,
        idempotent: bool,
        error: Error,
    ) -> RetryResult {
        self.inner
            .on_error(loop_start, attempt_count, idempotent, error)
            .exhaust_if(Instant::now() >= self.deadline(loop_start))
    }

    fn remaining_time(&self, loop_start: Instant, attempt_count: u32) -> Option<Duration> {
        let ours = self.deadline(loop_start).saturating_duration_since(Instant::now());
        let theirs = self.inner.remaining_time(loop_start, attempt_count);
        Some(theirs.map_or(ours, |t| t.min(ours)))
    }
}

/// Caps the number of attempts around an inner policy.
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

impl<P: RetryPolicy> LimitedAttemptCount<P> {
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }
}

impl<P: RetryPolicy> RetryPolicy for LimitedAttemptCount<P> {
    fn on_error(
        &self,
        loop_start: Instant,
        attempt_count: u32,
        idempotent: bool,
        error: Error,
    ) -> RetryResult {
        self.inner
            .on_error(loop_start, attempt_count, idempotent, error)
            .exhaust_if(attempt_count >= self.maximum_attempts)
    }

    fn remaining_time(&self, loop_start: Instant, attempt_count: u32) -> Option<Duration> {
        self.inner.remaining_time(loop_start, attempt_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CredentialsError;
    use crate::error::rpc::Status;
    use std::sync::Arc;
    use test_case::test_case;

    mockall::mock! {
        #[derive(Debug)]
        Inner {}
        impl RetryPolicy for Inner {
            fn on_error(&self, loop_start: Instant, attempt_count: u32, idempotent: bool, error: Error) -> RetryResult;
            fn remaining_time(&self, loop_start: Instant, attempt_count: u32) -> Option<Duration>;
        }
    }

    fn status(code: u16) -> Error {
        Error::service_with_http_metadata(Status::default().set_code(code), Some(code), None)
    }

    fn auth(transient: bool) -> Error {
        Error::authentication(CredentialsError::from_msg(transient, "token endpoint"))
    }

    #[test_case(status(503), true, true)]
    #[test_case(status(503), false, false)]
    #[test_case(status(500), true, false)]
    #[test_case(status(403), true, false)]
    #[test_case(Error::io("reset"), true, true)]
    #[test_case(Error::io("reset"), false, false)]
    #[test_case(auth(true), false, true)]
    #[test_case(auth(false), true, false)]
    #[test_case(Error::ser("bad"), true, false)]
    #[test_case(Error::deser("bad"), true, false)]
    fn aip194_strict(error: Error, idempotent: bool, want_continue: bool) {
        let got = Aip194Strict.on_error(Instant::now(), 1, idempotent, error);
        assert_eq!(got.is_continue(), want_continue, "{got:?}");
        assert_eq!(got.is_permanent(), !want_continue, "{got:?}");
        assert!(Aip194Strict.remaining_time(Instant::now(), 1).is_none());
    }

    #[test]
    fn always_and_never() {
        let now = Instant::now();
        assert!(AlwaysRetry.on_error(now, 9, false, status(400)).is_continue());
        assert!(NeverRetry.on_error(now, 1, true, status(503)).is_exhausted());
    }

    #[test]
    fn attempt_limit() {
        let mut inner = MockInner::new();
        inner
            .expect_on_error()
            .times(3)
            .returning(|_, _, _, e| RetryResult::Continue(e));
        let policy = inner.with_attempt_limit(3);
        let now = Instant::now();
        assert!(policy.on_error(now, 1, true, Error::io("e")).is_continue());
        assert!(policy.on_error(now, 2, true, Error::io("e")).is_continue());
        assert!(policy.on_error(now, 3, true, Error::io("e")).is_exhausted());
    }

    #[test]
    fn attempt_limit_forwards_permanent_and_remaining_time() {
        let mut inner = MockInner::new();
        inner
            .expect_on_error()
            .once()
            .returning(|_, _, _, e| RetryResult::Permanent(e));
        inner
            .expect_remaining_time()
            .once()
            .returning(|_, _| Some(Duration::from_secs(7)));
        let policy = LimitedAttemptCount::custom(inner, 2);
        let now = Instant::now();
        assert!(policy.on_error(now, 4, true, status(400)).is_permanent());
        assert_eq!(policy.remaining_time(now, 1), Some(Duration::from_secs(7)));
    }

    #[test]
    fn time_limit() {
        let mut inner = MockInner::new();
        inner
            .expect_on_error()
            .times(2)
            .returning(|_, _, _, e| RetryResult::Continue(e));
        let policy = inner.with_time_limit(Duration::from_secs(60));
        let now = Instant::now();
        assert!(policy.on_error(now, 1, true, Error::io("e")).is_continue());
        let long_ago = now - Duration::from_secs(61);
        assert!(policy.on_error(long_ago, 2, true, Error::io("e")).is_exhausted());
    }

    #[test]
    fn time_limit_remaining_time() {
        let mut inner = MockInner::new();
        let mut seq = mockall::Sequence::new();
        inner
            .expect_remaining_time()
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _| Some(Duration::from_secs(5)));
        inner
            .expect_remaining_time()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| None);
        let policy = LimitedElapsedTime::custom(inner, Duration::from_secs(60));

        let now = Instant::now();
        assert_eq!(policy.remaining_time(now, 1), Some(Duration::from_secs(5)));
        let got = policy.remaining_time(now, 1);
        assert!(got.is_some_and(|d| d <= Duration::from_secs(60)), "{got:?}");
        let long_ago = now - Duration::from_secs(120);
        assert_eq!(policy.remaining_time(long_ago, 1), Some(Duration::ZERO));
    }

    #[test]
    fn default_inner_policy() {
        let now = Instant::now();
        let policy = LimitedElapsedTime::new(Duration::from_secs(10));
        assert!(policy.on_error(now, 1, true, status(503)).is_continue());
        let policy = LimitedAttemptCount::new(1);
        assert!(policy.on_error(now, 1, true, status(503)).is_exhausted());
    }

    #[test]
    fn arg_conversions() {
        let policy: Arc<dyn RetryPolicy> = RetryPolicyArg::from(NeverRetry).into();
        let arg = RetryPolicyArg::from(policy);
        assert!(arg.0.on_error(Instant::now(), 1, true, status(503)).is_exhausted());
    }
}
