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

//! Options that override the client configuration for a single call.
//!
//! Each client method returns a request builder. Those builders implement
//! [RequestOptionsBuilder], so any call can change its timeout, its retry
//! behavior, or its idempotency:
//!
//! ```
//! # use cloudkit_gax::options::*;
//! # use cloudkit_gax::retry_policy::{Aip194Strict, RetryPolicyExt};
//! use std::time::Duration;
//! let mut options = RequestOptions::default();
//! options.set_attempt_timeout(Duration::from_secs(10));
//! options.set_retry_policy(Aip194Strict.with_attempt_limit(3));
//! assert_eq!(options.attempt_timeout(), Some(Duration::from_secs(10)));
//! ```

use crate::backoff_policy::{BackoffPolicy, BackoffPolicyArg};
use crate::polling_backoff_policy::{PollingBackoffPolicy, PollingBackoffPolicyArg};
use crate::polling_error_policy::{PollingErrorPolicy, PollingErrorPolicyArg};
use crate::retry_policy::{RetryPolicy, RetryPolicyArg};
use std::sync::Arc;
use std::time::Duration;

/// The per-call configuration. Anything left unset uses the client's value.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    idempotent: Option<bool>,
    user_agent: Option<String>,
    attempt_timeout: Option<Duration>,
    policies: Policies,
}

#[derive(Clone, Debug, Default)]
struct Policies {
    retry: Option<Arc<dyn RetryPolicy>>,
    backoff: Option<Arc<dyn BackoffPolicy>>,
    polling_error: Option<Arc<dyn PollingErrorPolicy>>,
    polling_backoff: Option<Arc<dyn PollingBackoffPolicy>>,
}

impl RequestOptions {
    /// Overrides whether the call is safe to retry.
    pub fn set_idempotency(&mut self, value: bool) {
        self.idempotent = Some(value);
    }

    /// Used by the clients to apply the idempotency of each RPC, unless
    /// the application already chose one.
    pub fn set_default_idempotency(mut self, default: bool) -> Self {
        self.idempotent.get_or_insert(default);
        self
    }

    /// False unless set.
    pub fn idempotent(&self) -> bool {
        self.idempotent == Some(true)
    }

    /// A prefix for the `user-agent` header.
    pub fn set_user_agent<T: Into<String>>(&mut self, v: T) {
        self.user_agent = Some(v.into());
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// The timeout for each attempt. The retry loop shortens it when the
    /// retry policy has less time left.
    pub fn set_attempt_timeout<T: Into<Duration>>(&mut self, v: T) {
        self.attempt_timeout = Some(v.into());
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    pub fn set_retry_policy<V: Into<RetryPolicyArg>>(&mut self, v: V) {
        self.policies.retry = Some(v.into().0);
    }

    pub fn retry_policy(&self) -> Option<Arc<dyn RetryPolicy>> {
        self.policies.retry.clone()
    }

    pub fn set_backoff_policy<V: Into<BackoffPolicyArg>>(&mut self, v: V) {
        self.policies.backoff = Some(v.into().0);
    }

    pub fn backoff_policy(&self) -> Option<Arc<dyn BackoffPolicy>> {
        self.policies.backoff.clone()
    }

    pub fn set_polling_error_policy<V: Into<PollingErrorPolicyArg>>(&mut self, v: V) {
        self.policies.polling_error = Some(v.into().0);
    }

    pub fn polling_error_policy(&self) -> Option<Arc<dyn PollingErrorPolicy>> {
        self.policies.polling_error.clone()
    }

    pub fn set_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(&mut self, v: V) {
        self.policies.polling_backoff = Some(v.into().0);
    }

    pub fn polling_backoff_policy(&self) -> Option<Arc<dyn PollingBackoffPolicy>> {
        self.policies.polling_backoff.clone()
    }
}

/// Per-call overrides, implemented by every request builder.
pub trait RequestOptionsBuilder: internal::RequestBuilder {
    /// Overrides whether the call is safe to retry.
    fn with_idempotency(self, v: bool) -> Self;

    /// Prefixes the `user-agent` header with `v`.
    fn with_user_agent<V: Into<String>>(self, v: V) -> Self;

    fn with_attempt_timeout<V: Into<Duration>>(self, v: V) -> Self;

    fn with_retry_policy<V: Into<RetryPolicyArg>>(self, v: V) -> Self;

    fn with_backoff_policy<V: Into<BackoffPolicyArg>>(self, v: V) -> Self;

    /// Only used by calls that wait for a job to finish.
    fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(self, v: V) -> Self;

    /// Only used by calls that wait for a job to finish.
    fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(self, v: V) -> Self;
}

#[doc(hidden)]
pub mod internal {
    /// Gives [RequestOptionsBuilder][super::RequestOptionsBuilder] access to
    /// a builder's options.
    pub trait RequestBuilder {
        fn request_options(&mut self) -> &mut super::RequestOptions;
    }
}

impl<T: internal::RequestBuilder> RequestOptionsBuilder for T {
    fn with_idempotency(mut self, v: bool) -> Self {
        self.request_options().set_idempotency(v);
        self
    }

    fn with_user_agent<V: Into<String>>(mut self, v: V) -> Self {
        self.request_options().set_user_agent(v);
        self
    }

    fn with_attempt_timeout<V: Into<Duration>>(mut self, v: V) -> Self {
        self.request_options().set_attempt_timeout(v);
        self
    }

    fn with_retry_policy<V: Into<RetryPolicyArg>>(mut self, v: V) -> Self {
        self.request_options().set_retry_policy(v);
        self
    }

    fn with_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        self.request_options().set_backoff_policy(v);
        self
    }

    fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.request_options().set_polling_error_policy(v);
        self
    }

    fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.request_options().set_polling_backoff_policy(v);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exponential_backoff::ExponentialBackoffBuilder;
    use crate::polling_error_policy::AlwaysContinue;
    use crate::retry_policy::NeverRetry;

    #[derive(Default)]
    struct FakeRequest(RequestOptions);

    impl internal::RequestBuilder for FakeRequest {
        fn request_options(&mut self) -> &mut RequestOptions {
            &mut self.0
        }
    }

    #[test]
    fn defaults() {
        let opts = RequestOptions::default();
        assert!(!opts.idempotent());
        assert!(opts.user_agent().is_none());
        assert!(opts.attempt_timeout().is_none());
        assert!(opts.retry_policy().is_none());
        assert!(opts.backoff_policy().is_none());
        assert!(opts.polling_error_policy().is_none());
        assert!(opts.polling_backoff_policy().is_none());
    }

    #[test]
    fn default_idempotency_keeps_explicit_value() {
        let opts = RequestOptions::default().set_default_idempotency(true);
        assert!(opts.idempotent());

        let mut opts = RequestOptions::default();
        opts.set_idempotency(false);
        assert!(!opts.set_default_idempotency(true).idempotent());
    }

    #[test]
    fn builder_overrides() {
        let FakeRequest(opts) = FakeRequest::default()
            .with_idempotency(true)
            .with_user_agent("my-app/1.0")
            .with_attempt_timeout(Duration::from_secs(7))
            .with_retry_policy(NeverRetry)
            .with_backoff_policy(ExponentialBackoffBuilder::new().clamp())
            .with_polling_error_policy(AlwaysContinue)
            .with_polling_backoff_policy(ExponentialBackoffBuilder::new().clamp());
        assert!(opts.idempotent());
        assert_eq!(opts.user_agent(), Some("my-app/1.0"));
        assert_eq!(opts.attempt_timeout(), Some(Duration::from_secs(7)));
        assert!(opts.retry_policy().is_some(), "{opts:?}");
        assert!(opts.backoff_policy().is_some(), "{opts:?}");
        assert!(opts.polling_error_policy().is_some(), "{opts:?}");
        assert!(opts.polling_backoff_policy().is_some(), "{opts:?}");
    }
}
