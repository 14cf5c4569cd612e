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

use crate::Result;
use crate::backoff_policy::BackoffPolicy;
use crate::client_builder::{ClientConfig, Error as BuilderError};
use crate::credentials::Credentials;
use crate::error::Error;
use crate::exponential_backoff::ExponentialBackoff;
use crate::options::RequestOptions;
use crate::polling_backoff_policy::PollingBackoffPolicy;
use crate::polling_error_policy::{Aip194Strict, PollingErrorPolicy};
use crate::response::{Parts, Response};
use crate::retry_policy::RetryPolicy;
use std::sync::Arc;
use tracing::Instrument;

const DEFAULT_USER_AGENT: &str = concat!("cloudkit-rust/", env!("CARGO_PKG_VERSION"));

/// The JSON-over-HTTP transport shared by the client libraries.
///
/// Each service client holds one of these. It resolves the endpoint, the
/// credentials, and the default policies once, and then runs each request
/// either as a single attempt or through the retry loop.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    cred: Credentials,
    endpoint: String,
    tracing: bool,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    backoff_policy: Option<Arc<dyn BackoffPolicy>>,
    polling_error_policy: Option<Arc<dyn PollingErrorPolicy>>,
    polling_backoff_policy: Option<Arc<dyn PollingBackoffPolicy>>,
}

impl ReqwestClient {
    /// Creates a new transport.
    ///
    /// The service crates resolve their default credentials before calling
    /// this function, a configuration without credentials is an error.
    pub async fn new(
        config: ClientConfig,
        default_endpoint: &str,
    ) -> crate::client_builder::Result<Self> {
        let tracing = config.tracing_enabled();
        let cred = config
            .cred
            .ok_or_else(|| BuilderError::cred("no credentials configured"))?;
        let inner = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(BuilderError::transport)?;
        let endpoint = config
            .endpoint
            .unwrap_or_else(|| default_endpoint.to_string());
        Ok(Self {
            inner,
            cred,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            tracing,
            retry_policy: config.retry_policy,
            backoff_policy: config.backoff_policy,
            polling_error_policy: config.polling_error_policy,
            polling_backoff_policy: config.polling_backoff_policy,
        })
    }

    /// The endpoint used by this client.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Starts a request for `path`, relative to the endpoint.
    pub fn builder(&self, method: reqwest::Method, path: String) -> reqwest::RequestBuilder {
        self.inner
            .request(method, format!("{}{path}", &self.endpoint))
    }

    /// Sends the request, retrying as configured, and parses the response.
    pub async fn execute<I: serde::ser::Serialize, O: serde::de::DeserializeOwned + Default>(
        &self,
        mut builder: reqwest::RequestBuilder,
        body: Option<I>,
        options: RequestOptions,
    ) -> Result<Response<O>> {
        if let Some(user_agent) = options.user_agent() {
            let value = format!("{user_agent} {DEFAULT_USER_AGENT}");
            builder = builder.header(
                reqwest::header::USER_AGENT,
                reqwest::header::HeaderValue::from_str(&value).map_err(Error::ser)?,
            );
        }
        if let Some(body) = body {
            let payload = serde_json::to_vec(&body).map_err(Error::ser)?;
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }
        match self.get_retry_policy(&options) {
            None => self.request_attempt::<O>(builder, &options, None, 1).await,
            Some(policy) => self.retry_loop::<O>(builder, options, policy).await,
        }
    }

    async fn retry_loop<O: serde::de::DeserializeOwned + Default>(
        &self,
        builder: reqwest::RequestBuilder,
        options: RequestOptions,
        retry_policy: Arc<dyn RetryPolicy>,
    ) -> Result<Response<O>> {
        let idempotent = options.idempotent();
        let backoff = self.get_backoff_policy(&options);
        let this = self.clone();
        let mut attempt = 0_u32;
        let inner = async move |d| {
            attempt += 1;
            let builder = builder
                .try_clone()
                .ok_or_else(|| Error::ser("the request body cannot be cloned for a retry"))?;
            this.request_attempt(builder, &options, d, attempt).await
        };
        let sleep = async |d| tokio::time::sleep(d).await;
        crate::retry_loop_internal::retry_loop(inner, sleep, idempotent, retry_policy, backoff)
            .await
    }

    async fn request_attempt<O: serde::de::DeserializeOwned + Default>(
        &self,
        mut builder: reqwest::RequestBuilder,
        options: &RequestOptions,
        remaining_time: Option<std::time::Duration>,
        attempt: u32,
    ) -> Result<Response<O>> {
        builder = crate::retry_loop_internal::effective_timeout(options, remaining_time)
            .into_iter()
            .fold(builder, |b, t| b.timeout(t));
        let mut request = builder.build().map_err(Error::ser)?;
        let auth_headers = self
            .cred
            .headers(&request)
            .await
            .map_err(Error::authentication)?;
        request.headers_mut().extend(auth_headers);

        if !self.tracing {
            return self.send(request).await;
        }
        let span = tracing::info_span!(
            "http_request",
            method = %request.method(),
            url = %request.url(),
            attempt,
        );
        self.send(request).instrument(span).await
    }

    async fn send<O: serde::de::DeserializeOwned + Default>(
        &self,
        request: reqwest::Request,
    ) -> Result<Response<O>> {
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self
            .inner
            .execute(request)
            .await
            .map_err(Self::map_send_error)?;
        if !response.status().is_success() {
            return self::to_http_error(response).await;
        }
        self::to_http_response(response).await
    }

    fn map_send_error(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error::timeout(e),
            e => Error::io(e),
        }
    }

    fn get_retry_policy(&self, options: &RequestOptions) -> Option<Arc<dyn RetryPolicy>> {
        options
            .retry_policy()
            .or_else(|| self.retry_policy.clone())
    }

    pub(crate) fn get_backoff_policy(&self, options: &RequestOptions) -> Arc<dyn BackoffPolicy> {
        options
            .backoff_policy()
            .or_else(|| self.backoff_policy.clone())
            .unwrap_or_else(|| Arc::new(ExponentialBackoff::default()))
    }

    /// The polling error policy for `options`, falling back to the client
    /// configuration and then to [Aip194Strict].
    pub fn get_polling_error_policy(&self, options: &RequestOptions) -> Arc<dyn PollingErrorPolicy> {
        options
            .polling_error_policy()
            .or_else(|| self.polling_error_policy.clone())
            .unwrap_or_else(|| Arc::new(Aip194Strict))
    }

    /// The polling backoff policy for `options`, falling back to the client
    /// configuration and then to [ExponentialBackoff::default()].
    pub fn get_polling_backoff_policy(
        &self,
        options: &RequestOptions,
    ) -> Arc<dyn PollingBackoffPolicy> {
        options
            .polling_backoff_policy()
            .or_else(|| self.polling_backoff_policy.clone())
            .unwrap_or_else(|| Arc::new(ExponentialBackoff::default()))
    }
}

/// Use as the request body type for requests without a body.
#[derive(serde::Serialize)]
pub struct NoBody;

/// Converts an unsuccessful response into an error.
pub async fn to_http_error<O>(response: reqwest::Response) -> Result<O> {
    let status_code = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(Error::io)?;

    let error = match crate::error::rpc::Status::try_from(&body) {
        Ok(mut status) => {
            if status.code == 0 {
                status.code = status_code;
            }
            Error::service_with_http_metadata(status, Some(status_code), Some(headers))
        }
        Err(_) => Error::http(status_code, headers, body),
    };
    Err(error)
}

async fn to_http_response<O: serde::de::DeserializeOwned + Default>(
    response: reqwest::Response,
) -> Result<Response<O>> {
    let headers = response.headers().clone();
    let content = response.bytes().await.map_err(Error::io)?;
    // 204 No Content, and some successful DELETE calls, have an empty body.
    let body = if content.is_empty() {
        O::default()
    } else {
        serde_json::from_slice::<O>(&content).map_err(Error::deser)?
    };
    Ok(Response::from_parts(Parts::new().set_headers(headers), body))
}
