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

//! Defines the retry policies for BigQuery.
//!
//! The service [recommends] retrying requests that fail with HTTP 502, 503 or
//! 504 responses, and requests where the error details carry one of these
//! reasons:
//!
//! - `backendError`
//! - `rateLimitExceeded`
//! - `internalError`
//! - `jobBackendError`
//! - `jobInternalError`
//!
//! A `rateLimitExceeded` error means the service rejected the request before
//! acting on it, so it is retried even when the request is not idempotent.
//!
//! [recommends]: https://cloud.google.com/bigquery/docs/error-messages

use gax::error::Error;
use gax::retry_policy::{RetryPolicy, RetryPolicyExt};
use gax::retry_result::RetryResult;
use std::time::Duration;

const RETRYABLE_REASONS: [&str; 5] = [
    "backendError",
    "rateLimitExceeded",
    "internalError",
    "jobBackendError",
    "jobInternalError",
];

/// The default retry policy for the BigQuery client.
///
/// Retries the errors listed by [BigQueryRetry] and stops after 60 seconds.
pub(crate) fn bigquery_default() -> impl RetryPolicy {
    BigQueryRetry.with_time_limit(Duration::from_secs(60))
}

/// Retries the errors the BigQuery service documents as transient.
///
/// This policy must be decorated to limit the number of retry attempts or the
/// duration of the retry loop.
///
/// # Example
/// ```
/// # use cloudkit_bigquery::retry_policy::BigQueryRetry;
/// use cloudkit_bigquery::client::Client;
/// use gax::retry_policy::RetryPolicyExt;
/// use std::time::Duration;
/// let builder = Client::builder().with_retry_policy(
///     BigQueryRetry
///         .with_time_limit(Duration::from_secs(120))
///         .with_attempt_limit(10),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct BigQueryRetry;

impl RetryPolicy for BigQueryRetry {
    fn on_error(
        &self,
        _loop_start: std::time::Instant,
        _attempt_count: u32,
        idempotent: bool,
        error: Error,
    ) -> RetryResult {
        if error.is_transient_and_before_rpc() {
            return RetryResult::Continue(error);
        }
        if error
            .status()
            .is_some_and(|s| s.has_reason("rateLimitExceeded"))
        {
            return RetryResult::Continue(error);
        }
        if !idempotent {
            return RetryResult::Permanent(error);
        }
        if error.is_io() {
            return RetryResult::Continue(error);
        }
        if let Some(status) = error.status() {
            if RETRYABLE_REASONS.iter().any(|r| status.has_reason(r)) {
                return RetryResult::Continue(error);
            }
        }
        match error.http_status_code() {
            Some(502..=504) => RetryResult::Continue(error),
            _ => RetryResult::Permanent(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gax::error::CredentialsError;
    use gax::error::rpc::{ErrorDetail, Status};
    use http::HeaderMap;
    use std::time::Instant;
    use test_case::test_case;

    fn http_error(code: u16) -> Error {
        Error::http(code, HeaderMap::new(), bytes::Bytes::from_static(b"bad"))
    }

    fn reason_error(code: u16, reason: &str) -> Error {
        let status = Status::default()
            .set_code(code)
            .set_message("try again")
            .set_errors([ErrorDetail::default().set_reason(reason)]);
        Error::service_with_http_metadata(status, Some(code), None)
    }

    fn on_error(idempotent: bool, error: Error) -> RetryResult {
        BigQueryRetry.on_error(Instant::now(), 1, idempotent, error)
    }

    #[test_case(502)]
    #[test_case(503)]
    #[test_case(504)]
    fn retryable_http(code: u16) {
        assert!(on_error(true, http_error(code)).is_continue());
        assert!(on_error(false, http_error(code)).is_permanent());
    }

    #[test_case(400)]
    #[test_case(401)]
    #[test_case(404)]
    #[test_case(500)]
    fn permanent_http(code: u16) {
        assert!(on_error(true, http_error(code)).is_permanent());
        assert!(on_error(false, http_error(code)).is_permanent());
    }

    #[test_case(500, "backendError")]
    #[test_case(500, "internalError")]
    #[test_case(400, "jobBackendError")]
    #[test_case(400, "jobInternalError")]
    fn retryable_reasons(code: u16, reason: &str) {
        assert!(on_error(true, reason_error(code, reason)).is_continue());
        assert!(on_error(false, reason_error(code, reason)).is_permanent());
    }

    #[test]
    fn rate_limit_always_retried() {
        assert!(on_error(true, reason_error(403, "rateLimitExceeded")).is_continue());
        assert!(on_error(false, reason_error(403, "rateLimitExceeded")).is_continue());
    }

    #[test_case(400, "invalidQuery")]
    #[test_case(403, "quotaExceeded")]
    #[test_case(404, "notFound")]
    fn permanent_reasons(code: u16, reason: &str) {
        assert!(on_error(true, reason_error(code, reason)).is_permanent());
    }

    #[test]
    fn io() {
        assert!(on_error(true, Error::io("reset")).is_continue());
        assert!(on_error(false, Error::io("reset")).is_permanent());
    }

    #[test]
    fn authentication() {
        let transient = Error::authentication(CredentialsError::from_msg(true, "try again"));
        assert!(on_error(false, transient).is_continue());
        let permanent = Error::authentication(CredentialsError::from_msg(false, "bad key"));
        assert!(on_error(true, permanent).is_permanent());
    }

    #[test]
    fn default_policy_has_a_time_limit() {
        let policy = bigquery_default();
        let remaining = policy.remaining_time(Instant::now(), 1);
        assert!(remaining.is_some_and(|d| d <= Duration::from_secs(60)), "{remaining:?}");
    }
}
