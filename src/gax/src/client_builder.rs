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

//! The builder shared by every client type.
//!
//! Each client exposes `builder()`, returning a [ClientBuilder] specialized
//! with that service's [ClientFactory]. The builder records overrides, the
//! factory fills in everything else (the endpoint, the credentials, and the
//! service's retry policy) when the client is built.
//!
//! ```ignore
//! let client = Client::builder()
//!     .with_endpoint("https://private.example.com")
//!     .with_retry_policy(Aip194Strict.with_attempt_limit(5))
//!     .build()
//!     .await?;
//! ```

use crate::backoff_policy::{BackoffPolicy, BackoffPolicyArg};
use crate::credentials::Credentials;
use crate::polling_backoff_policy::{PollingBackoffPolicy, PollingBackoffPolicyArg};
use crate::polling_error_policy::{PollingErrorPolicy, PollingErrorPolicyArg};
use crate::retry_policy::{RetryPolicy, RetryPolicyArg};
use std::future::Future;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A client could not be created.
///
/// ```
/// # use cloudkit_gax::client_builder::Error;
/// let error = Error::cred("no credentials found");
/// assert!(error.is_default_credentials());
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot load the default credentials: {0}")]
    #[doc(hidden)]
    DefaultCredentials(#[source] BoxError),
    #[error("cannot create the HTTP client: {0}")]
    #[doc(hidden)]
    Transport(#[source] BoxError),
}

impl Error {
    pub fn cred<T: Into<BoxError>>(source: T) -> Self {
        Self::DefaultCredentials(source.into())
    }

    pub fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self::Transport(source.into())
    }

    /// The credentials were not configured and the defaults could not be
    /// loaded.
    pub fn is_default_credentials(&self) -> bool {
        matches!(self, Self::DefaultCredentials(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Collects a [ClientConfig] and hands it to a [ClientFactory].
#[derive(Clone, Debug)]
pub struct ClientBuilder<F> {
    config: ClientConfig,
    factory: F,
}

impl<F: ClientFactory> ClientBuilder<F> {
    pub fn new(factory: F) -> Self {
        Self {
            config: ClientConfig::default(),
            factory,
        }
    }

    pub async fn build(self) -> Result<F::Client> {
        self.factory.build(self.config).await
    }
}

impl<F> ClientBuilder<F> {
    /// Sends requests to `v` instead of the service's default endpoint.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.config.endpoint = Some(v.into());
        self
    }

    /// Wraps each HTTP attempt in a `tracing` span.
    ///
    /// Setting `CLOUDKIT_TRACING=true` in the environment has the same
    /// effect.
    pub fn with_tracing(mut self) -> Self {
        self.config.tracing = true;
        self
    }

    /// Uses `v` instead of the default credentials.
    pub fn with_credentials<T: Into<Credentials>>(mut self, v: T) -> Self {
        self.config.cred = Some(v.into());
        self
    }

    pub fn with_retry_policy<V: Into<RetryPolicyArg>>(mut self, v: V) -> Self {
        self.config.retry_policy = Some(v.into().0);
        self
    }

    pub fn with_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        self.config.backoff_policy = Some(v.into().0);
        self
    }

    /// The default error policy for calls that wait on a job.
    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.config.polling_error_policy = Some(v.into().0);
        self
    }

    /// The default backoff for calls that wait on a job.
    pub fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.config.polling_backoff_policy = Some(v.into().0);
        self
    }
}

/// Implemented by each service crate to turn a [ClientConfig] into a client.
pub trait ClientFactory {
    type Client;
    fn build(self, config: ClientConfig) -> impl Future<Output = Result<Self::Client>> + Send;
}

/// Everything the application configured. Unset fields use the service
/// defaults.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub endpoint: Option<String>,
    pub cred: Option<Credentials>,
    pub tracing: bool,
    pub retry_policy: Option<Arc<dyn RetryPolicy>>,
    pub backoff_policy: Option<Arc<dyn BackoffPolicy>>,
    pub polling_error_policy: Option<Arc<dyn PollingErrorPolicy>>,
    pub polling_backoff_policy: Option<Arc<dyn PollingBackoffPolicy>>,
}

pub(crate) const TRACING_VAR: &str = "CLOUDKIT_TRACING";

impl ClientConfig {
    pub fn tracing_enabled(&self) -> bool {
        self.tracing || std::env::var(TRACING_VAR).is_ok_and(|v| v == "true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AnonymousCredentials;
    use crate::exponential_backoff::ExponentialBackoff;
    use crate::polling_error_policy::{AlwaysContinue, PollingErrorPolicyExt};
    use crate::retry_policy::{AlwaysRetry, RetryPolicyExt};
    use scoped_env::ScopedEnv;
    use std::error::Error as _;

    #[derive(Debug)]
    struct Client(ClientConfig);

    struct Factory;
    impl ClientFactory for Factory {
        type Client = Client;
        async fn build(self, config: ClientConfig) -> Result<Client> {
            Ok(Client(config))
        }
    }

    fn builder() -> ClientBuilder<Factory> {
        ClientBuilder::new(Factory)
    }

    #[tokio::test]
    async fn build_default() -> anyhow::Result<()> {
        let config = builder().build().await?.0;
        assert_eq!(config.endpoint, None);
        assert!(config.cred.is_none(), "{config:?}");
        assert!(!config.tracing);
        assert!(config.retry_policy.is_none(), "{config:?}");
        assert!(config.backoff_policy.is_none(), "{config:?}");
        assert!(config.polling_error_policy.is_none(), "{config:?}");
        assert!(config.polling_backoff_policy.is_none(), "{config:?}");
        Ok(())
    }

    #[tokio::test]
    async fn with_all() -> anyhow::Result<()> {
        let config = builder()
            .with_endpoint("http://example.com")
            .with_tracing()
            .with_credentials(AnonymousCredentials::new())
            .with_retry_policy(AlwaysRetry.with_attempt_limit(3))
            .with_backoff_policy(ExponentialBackoff::default())
            .with_polling_error_policy(AlwaysContinue.with_attempt_limit(3))
            .with_polling_backoff_policy(ExponentialBackoff::default())
            .build()
            .await?
            .0;
        assert_eq!(config.endpoint.as_deref(), Some("http://example.com"));
        assert!(config.tracing);
        assert!(config.tracing_enabled());
        assert!(config.cred.is_some(), "{config:?}");
        assert!(config.retry_policy.is_some(), "{config:?}");
        assert!(config.backoff_policy.is_some(), "{config:?}");
        assert!(config.polling_error_policy.is_some(), "{config:?}");
        assert!(config.polling_backoff_policy.is_some(), "{config:?}");
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn tracing_from_env() {
        let config = ClientConfig::default();
        let _e = ScopedEnv::remove(TRACING_VAR);
        assert!(!config.tracing_enabled());
        let _e = ScopedEnv::set(TRACING_VAR, "true");
        assert!(config.tracing_enabled());
        let _e = ScopedEnv::set(TRACING_VAR, "yes");
        assert!(!config.tracing_enabled());
    }

    #[test]
    fn errors() {
        let e = Error::cred("no credentials");
        assert!(e.is_default_credentials(), "{e:?}");
        assert!(!e.is_transport(), "{e:?}");
        assert!(e.to_string().contains("no credentials"), "{e}");

        let e = Error::transport(std::io::Error::other("tls"));
        assert!(e.is_transport(), "{e:?}");
        assert!(e.source().is_some(), "{e:?}");
    }
}
