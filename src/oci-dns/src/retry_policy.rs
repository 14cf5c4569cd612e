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

//! Defines the retry policy for OCI DNS.
//!
//! OCI services ask clients to retry throttled requests (HTTP 429), server
//! errors (HTTP 500, 502, 503 and 504), and requests that failed before a
//! response was received. A `409 IncorrectState` means the resource is busy
//! with a previous change, and is also retried.
//!
//! Mutating requests carry an `opc-retry-token`, the service uses it to
//! detect duplicates. That makes all the requests sent by this client safe to
//! retry.

use gax::error::Error;
use gax::retry_policy::{RetryPolicy, RetryPolicyExt};
use gax::retry_result::RetryResult;
use std::time::Duration;

const INCORRECT_STATE: &str = "IncorrectState";

/// The default retry policy for the OCI DNS client.
///
/// Retries the errors listed by [OciRetry] for up to 8 attempts and 10
/// minutes.
pub(crate) fn oci_default() -> impl RetryPolicy {
    OciRetry
        .with_time_limit(Duration::from_secs(600))
        .with_attempt_limit(8)
}

/// Retries the errors OCI documents as transient.
///
/// This policy must be decorated to limit the number of retry attempts or the
/// duration of the retry loop.
///
/// # Example
/// ```
/// # use cloudkit_oci_dns::retry_policy::OciRetry;
/// use cloudkit_oci_dns::client::Client;
/// use gax::retry_policy::RetryPolicyExt;
/// let builder = Client::builder().with_retry_policy(OciRetry.with_attempt_limit(3));
/// ```
#[derive(Clone, Debug)]
pub struct OciRetry;

impl RetryPolicy for OciRetry {
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
        if !idempotent {
            return RetryResult::Permanent(error);
        }
        if error.is_io() {
            return RetryResult::Continue(error);
        }
        match error.http_status_code() {
            Some(429 | 500 | 502 | 503 | 504) => RetryResult::Continue(error),
            Some(409)
                if error
                    .status()
                    .is_some_and(|s| s.status.as_deref() == Some(INCORRECT_STATE)) =>
            {
                RetryResult::Continue(error)
            }
            _ => RetryResult::Permanent(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gax::error::CredentialsError;
    use gax::error::rpc::Status;
    use http::HeaderMap;
    use std::time::Instant;
    use test_case::test_case;

    fn oci_error(code: u16, symbol: &str) -> Error {
        let status = Status::default()
            .set_code(code)
            .set_status(symbol)
            .set_message("test message");
        Error::service_with_http_metadata(status, Some(code), None)
    }

    fn on_error(idempotent: bool, error: Error) -> RetryResult {
        OciRetry.on_error(Instant::now(), 1, idempotent, error)
    }

    #[test_case(429, "TooManyRequests")]
    #[test_case(500, "InternalServerError")]
    #[test_case(502, "BadGateway")]
    #[test_case(503, "ServiceUnavailable")]
    #[test_case(504, "GatewayTimeout")]
    #[test_case(409, "IncorrectState")]
    fn retryable(code: u16, symbol: &str) {
        assert!(on_error(true, oci_error(code, symbol)).is_continue());
        assert!(on_error(false, oci_error(code, symbol)).is_permanent());
    }

    #[test_case(400, "InvalidParameter")]
    #[test_case(401, "NotAuthenticated")]
    #[test_case(404, "NotAuthorizedOrNotFound")]
    #[test_case(409, "Conflict")]
    #[test_case(412, "PreconditionFailed")]
    fn permanent(code: u16, symbol: &str) {
        assert!(on_error(true, oci_error(code, symbol)).is_permanent());
    }

    #[test]
    fn unparsed_body() {
        let error = Error::http(503, HeaderMap::new(), bytes::Bytes::from_static(b"oops"));
        assert!(on_error(true, error).is_continue());
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
    fn default_policy_has_limits() {
        let policy = oci_default();
        let remaining = policy.remaining_time(Instant::now(), 1);
        assert!(
            remaining.is_some_and(|d| d <= Duration::from_secs(600)),
            "{remaining:?}"
        );
    }
}
