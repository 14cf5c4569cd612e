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
use gax::client_builder::ClientConfig;
use gax::http::{NoBody, ReqwestClient};
use gax::options::RequestOptions;
use gax::response::Response;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use std::collections::BTreeMap;

const API_VERSION: &str = "/20180115";
const OPC_RETRY_TOKEN: &str = "opc-retry-token";
const IF_MATCH: &str = "if-match";
const IF_NONE_MATCH: &str = "if-none-match";

// Zone names, OCIDs and domain names are path segments.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// The query parameters of a request, sorted to simplify testing.
pub(crate) type Query = BTreeMap<&'static str, String>;

/// Builds the path for `segments` under the API version.
pub(crate) fn path(segments: &[&str]) -> String {
    segments.iter().fold(API_VERSION.to_string(), |mut acc, s| {
        acc.push('/');
        acc.extend(utf8_percent_encode(s, SEGMENT));
        acc
    })
}

/// The optional `if-match` and `if-none-match` headers of a request.
#[derive(Clone, Debug, Default)]
pub(crate) struct Conditions {
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
}

impl Conditions {
    fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = match &self.if_match {
            Some(etag) => builder.header(IF_MATCH, etag),
            None => builder,
        };
        match &self.if_none_match {
            Some(etag) => builder.header(IF_NONE_MATCH, etag),
            None => builder,
        }
    }
}

/// Implements the OCI DNS REST API over [ReqwestClient].
#[derive(Clone, Debug)]
pub(crate) struct Dns {
    inner: ReqwestClient,
}

impl Dns {
    pub(crate) async fn new(
        config: ClientConfig,
        endpoint: &str,
    ) -> gax::client_builder::Result<Self> {
        let inner = ReqwestClient::new(config, endpoint).await?;
        Ok(Self { inner })
    }

    /// Sends a `GET` request.
    pub(crate) async fn get<O>(
        &self,
        path: String,
        query: &Query,
        conditions: &Conditions,
        options: RequestOptions,
    ) -> Result<Response<O>>
    where
        O: serde::de::DeserializeOwned + Default,
    {
        let options = options.set_default_idempotency(true);
        let builder = self.inner.builder(Method::GET, path).query(query);
        let builder = conditions.apply(builder);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    /// Sends a mutating request.
    ///
    /// All the attempts share one `opc-retry-token`, the service executes
    /// the request at most once.
    pub(crate) async fn mutate<I, O>(
        &self,
        method: Method,
        path: String,
        query: &Query,
        body: Option<I>,
        conditions: &Conditions,
        options: RequestOptions,
    ) -> Result<Response<O>>
    where
        I: serde::ser::Serialize,
        O: serde::de::DeserializeOwned + Default,
    {
        let options = options.set_default_idempotency(true);
        let token = uuid::Uuid::new_v4().simple().to_string();
        let builder = self
            .inner
            .builder(method, path)
            .query(query)
            .header(OPC_RETRY_TOKEN, token);
        let builder = conditions.apply(builder);
        self.inner.execute(builder, body, options).await
    }

    /// Sends a `DELETE` request, the response has no body.
    pub(crate) async fn delete(
        &self,
        path: String,
        query: &Query,
        conditions: &Conditions,
        options: RequestOptions,
    ) -> Result<Response<()>> {
        self.mutate::<NoBody, serde_json::Value>(
            Method::DELETE,
            path,
            query,
            None,
            conditions,
            options,
        )
        .await
        .map(|r| r.map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&["zones"], "/20180115/zones")]
    #[test_case(&["zones", "example.com"], "/20180115/zones/example.com")]
    #[test_case(&["zones", "ocid1.dns-zone.oc1..aaa"], "/20180115/zones/ocid1.dns-zone.oc1..aaa")]
    #[test_case(&["zones", "example.com", "records", "*.example.com"], "/20180115/zones/example.com/records/%2A.example.com")]
    #[test_case(&["zones", "a/b"], "/20180115/zones/a%2Fb")]
    fn paths(segments: &[&str], want: &str) {
        assert_eq!(path(segments), want);
    }
}
