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

//! The retry loop behind every client transport.
//!
//! Not intended for applications, the service crates use it to send their
//! requests.

use crate::Result;
use crate::backoff_policy::BackoffPolicy;
use crate::error::Error;
use crate::options::RequestOptions;
use crate::retry_policy::RetryPolicy;
use crate::retry_result::RetryResult;
use std::sync::Arc;
use std::time::Duration;

/// Calls `inner` until it succeeds or `retry_policy` stops the loop.
///
/// `inner` receives the time left in the retry policy, if it has a time
/// limit. Between attempts the loop sleeps for the delay chosen by
/// `backoff_policy`, using `sleep`. If the policy has less time left than
/// that delay the loop stops early, returning an
/// [exhausted][Error::is_exhausted] error whose source is the last error.
pub async fn retry_loop<F, S, Response>(
    mut inner: F,
    sleep: S,
    idempotent: bool,
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
) -> Result<Response>
where
    F: AsyncFnMut(Option<Duration>) -> Result<Response> + Send,
    S: AsyncFn(Duration) -> () + Send,
{
    let loop_start = tokio::time::Instant::now().into_std();
    let mut attempt_count = 0_u32;
    loop {
        let budget = retry_policy.remaining_time(loop_start, attempt_count);
        attempt_count += 1;
        tracing::debug!(attempt_count, ?budget, "starting attempt");
        let error = match inner(budget).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        let error = match retry_policy.on_error(loop_start, attempt_count, idempotent, error) {
            RetryResult::Continue(e) => e,
            stop => return Err(stop.into_error()),
        };
        let delay = backoff_policy.on_failure(loop_start, attempt_count);
        let left = retry_policy.remaining_time(loop_start, attempt_count);
        if left.is_some_and(|left| left < delay) {
            return Err(Error::exhausted(error));
        }
        tracing::warn!(attempt_count, ?delay, %error, "retrying request");
        sleep(delay).await;
    }
}

/// The timeout for one attempt: the shorter of the configured attempt
/// timeout and the time left in the retry policy.
pub fn effective_timeout(options: &RequestOptions, remaining_time: Option<Duration>) -> Option<Duration> {
    [options.attempt_timeout(), remaining_time]
        .into_iter()
        .flatten()
        .min()
}
