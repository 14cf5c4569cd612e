// Copyright 2024 Google LLC
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

use crate::error::CredentialsError;
use http::HeaderMap;
use std::future::Future;
use std::sync::Arc;

/// An alias of [std::result::Result] where the error is a [CredentialsError].
pub type Result<T> = std::result::Result<T, CredentialsError>;

/// Provides the authentication headers for each request.
///
/// Google services expect a bearer token, which the provider may refresh as
/// needed. OCI services expect each request to be signed, which requires the
/// method, URL, headers, and body of the request. To support both, the
/// provider receives the fully built [reqwest::Request] and returns the
/// headers that should be added to it.
///
/// The type is cheap to clone, all clones share the same provider.
#[derive(Clone, Debug)]
pub struct Credentials {
    // Credentials are shared across threads and cloned with each client, an
    // `Arc` gives us both.
    inner: Arc<dyn dynamic::CredentialsProvider>,
}

impl<T> std::convert::From<T> for Credentials
where
    T: CredentialsProvider + Send + Sync + 'static,
{
    fn from(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }
}

impl Credentials {
    /// Returns the headers to add to `request`.
    pub async fn headers(&self, request: &reqwest::Request) -> Result<HeaderMap> {
        self.inner.headers(request).await
    }
}

/// The trait implemented by all credential types.
///
/// Application developers can implement this trait to mock the credentials
/// in their tests, or to provide headers from a source the client libraries
/// do not support.
pub trait CredentialsProvider: std::fmt::Debug {
    /// Asynchronously constructs the headers for `request`.
    ///
    /// The implementation refreshes any cached token as needed.
    fn headers(&self, request: &reqwest::Request) -> impl Future<Output = Result<HeaderMap>> + Send;
}

pub(crate) mod dynamic {
    use super::{HeaderMap, Result};

    /// A dyn-compatible, crate-private version of `CredentialsProvider`.
    #[async_trait::async_trait]
    pub trait CredentialsProvider: Send + Sync + std::fmt::Debug {
        async fn headers(&self, request: &reqwest::Request) -> Result<HeaderMap>;
    }

    /// The public CredentialsProvider implements the dyn-compatible one.
    #[async_trait::async_trait]
    impl<T> CredentialsProvider for T
    where
        T: super::CredentialsProvider + Send + Sync,
    {
        async fn headers(&self, request: &reqwest::Request) -> Result<HeaderMap> {
            T::headers(self, request).await
        }
    }
}

/// Credentials that add no headers.
///
/// Useful to call public endpoints, and for tests against fake servers.
#[derive(Clone, Debug, Default)]
pub struct AnonymousCredentials;

impl AnonymousCredentials {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialsProvider for AnonymousCredentials {
    async fn headers(&self, _request: &reqwest::Request) -> Result<HeaderMap> {
        Ok(HeaderMap::new())
    }
}
