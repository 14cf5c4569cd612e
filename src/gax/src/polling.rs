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

//! The polling loop for long-running jobs.
//!
//! Services such as BigQuery start a job and return immediately. The client
//! queries the job until it reports completion. [poll_until] implements that
//! loop, consulting a [PollingErrorPolicy] when a query fails or the job is
//! still running, and sleeping between queries for the period prescribed by a
//! [PollingBackoffPolicy].

use crate::Result;
use crate::polling_backoff_policy::PollingBackoffPolicy;
use crate::polling_error_policy::PollingErrorPolicy;
use crate::retry_result::RetryResult;
use std::sync::Arc;
use std::time::Duration;

/// The outcome of a single query in the polling loop.
#[derive(Debug)]
pub enum PollingResult<O> {
    /// The job is complete, or the loop stopped with an error.
    Completed(Result<O>),
    /// The job is still running.
    InProgress(O),
    /// The query failed, but the policy allows polling to continue.
    PollingError(crate::error::Error),
}

/// Queries a job until `done` returns true.
///
/// * `name` - identifies the job in log messages and exhaustion errors.
/// * `query` - fetches the current state of the job.
/// * `done` - returns true when the state reports a finished job.
/// * `sleep` - waits between queries, tests provide a fake.
///
/// Returns the first state for which `done` is true. Returns an error if the
/// error policy rejects a query error, or if it stops the loop while the job
/// is still running.
pub async fn poll_until<O, Q, D, S>(
    name: &str,
    mut query: Q,
    done: D,
    sleep: S,
    error_policy: Arc<dyn PollingErrorPolicy>,
    backoff_policy: Arc<dyn PollingBackoffPolicy>,
) -> Result<O>
where
    Q: AsyncFnMut() -> Result<O> + Send,
    D: Fn(&O) -> bool + Send,
    S: AsyncFn(Duration) -> () + Send,
{
    let loop_start = tokio::time::Instant::now().into_std();
    let mut attempt_count = 0_u32;
    loop {
        attempt_count += 1;
        let result = query().await;
        match handle_poll(&*error_policy, loop_start, attempt_count, name, &done, result) {
            PollingResult::Completed(r) => return r,
            PollingResult::InProgress(_) => {
                tracing::debug!(name, attempt_count, "job still running");
            }
            PollingResult::PollingError(e) => {
                tracing::debug!(name, attempt_count, error = %e, "transient error while polling");
            }
        }
        sleep(backoff_policy.wait_period(loop_start, attempt_count)).await;
    }
}

fn handle_poll<O, D>(
    error_policy: &dyn PollingErrorPolicy,
    loop_start: std::time::Instant,
    attempt_count: u32,
    name: &str,
    done: &D,
    result: Result<O>,
) -> PollingResult<O>
where
    D: Fn(&O) -> bool,
{
    match result {
        Ok(o) if done(&o) => PollingResult::Completed(Ok(o)),
        Ok(o) => match error_policy.on_in_progress(loop_start, attempt_count, name) {
            Some(e) => PollingResult::Completed(Err(e)),
            None => PollingResult::InProgress(o),
        },
        Err(e) => match error_policy.on_error(loop_start, attempt_count, e) {
            RetryResult::Continue(e) => PollingResult::PollingError(e),
            RetryResult::Exhausted(e) | RetryResult::Permanent(e) => PollingResult::Completed(Err(e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::error::rpc::Status;
    use crate::exponential_backoff::ExponentialBackoffBuilder;
    use crate::polling_error_policy::{Aip194Strict, PollingErrorPolicyExt};
    use std::sync::Mutex;

    fn backoff() -> anyhow::Result<Arc<dyn PollingBackoffPolicy>> {
        let b = ExponentialBackoffBuilder::new()
            .with_initial_delay(Duration::from_millis(10))
            .with_maximum_delay(Duration::from_millis(40))
            .build()?;
        Ok(Arc::new(b))
    }

    fn http_error(code: u16) -> Error {
        Error::service_with_http_metadata(Status::default().set_code(code), Some(code), None)
    }

    #[tokio::test]
    async fn done_after_three_queries() -> anyhow::Result<()> {
        let mut states = vec!["DONE", "RUNNING", "PENDING"];
        let sleeps = Mutex::new(Vec::new());
        let got = poll_until(
            "job-1",
            async || Ok(states.pop().unwrap_or("DONE").to_string()),
            |s: &String| s == "DONE",
            async |d| sleeps.lock().map(|mut v| v.push(d)).unwrap_or_default(),
            Arc::new(Aip194Strict),
            backoff()?,
        )
        .await?;
        assert_eq!(got, "DONE");
        let sleeps = sleeps.into_inner()?;
        assert_eq!(
            sleeps,
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn transient_errors_continue() -> anyhow::Result<()> {
        let mut responses = vec![Ok("DONE"), Err(http_error(503)), Err(Error::io("reset"))];
        let got = poll_until(
            "job-1",
            async || responses.pop().unwrap_or(Ok("DONE")).map(str::to_string),
            |s: &String| s == "DONE",
            async |_| {},
            Arc::new(Aip194Strict),
            backoff()?,
        )
        .await?;
        assert_eq!(got, "DONE");
        Ok(())
    }

    #[tokio::test]
    async fn permanent_error_stops() -> anyhow::Result<()> {
        let mut responses = vec![Ok("DONE"), Err(http_error(404)), Ok("RUNNING")];
        let got = poll_until(
            "job-1",
            async || responses.pop().unwrap_or(Ok("DONE")).map(str::to_string),
            |s: &String| s == "DONE",
            async |_| {},
            Arc::new(Aip194Strict),
            backoff()?,
        )
        .await;
        let err = got.expect_err("404 is a permanent error");
        assert_eq!(err.http_status_code(), Some(404), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_while_running() -> anyhow::Result<()> {
        let mut count = 0;
        let got = poll_until(
            "job-1",
            async || {
                count += 1;
                Ok("RUNNING".to_string())
            },
            |s: &String| s == "DONE",
            async |_| {},
            Arc::new(Aip194Strict.with_attempt_limit(3)),
            backoff()?,
        )
        .await;
        let err = got.expect_err("the policy limits the attempts");
        assert!(err.is_exhausted(), "{err:?}");
        assert!(err.to_string().contains("job-1"), "{err}");
        assert_eq!(count, 3);
        Ok(())
    }
}
