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

//! Response types.
//!
//! Most RPCs return the resource in the response body. Some services also
//! return important information in the headers: OCI services report the
//! resource `etag`, the `opc-request-id` used for troubleshooting, and the
//! `opc-next-page` pagination token. [Response] keeps both.
//!
//! # Example
//! ```
//! # use cloudkit_gax::response::{Parts, Response};
//! let mut headers = http::HeaderMap::new();
//! headers.insert("etag", http::HeaderValue::from_static("abc"));
//! let response = Response::from_parts(Parts::new().set_headers(headers), 42);
//! assert_eq!(response.etag(), Some("abc"));
//! assert_eq!(response.into_body(), 42);
//! ```

const ETAG: &str = "etag";
const OPC_REQUEST_ID: &str = "opc-request-id";
const OPC_NEXT_PAGE: &str = "opc-next-page";

/// Represents a service response: the body plus the response headers.
#[derive(Clone, Debug)]
pub struct Response<T> {
    parts: Parts,
    body: T,
}

impl<T> Response<T> {
    /// Creates a response with empty metadata, mostly useful in mocks.
    pub fn from(body: T) -> Self {
        Self {
            body,
            parts: Parts::default(),
        }
    }

    /// Creates a response from the given parts.
    pub fn from_parts(parts: Parts, body: T) -> Self {
        Self { parts, body }
    }

    /// Returns the headers associated with this response.
    pub fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.parts.headers
    }

    /// Returns the body associated with this response.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Consumes the response returning the metadata and body.
    pub fn into_parts(self) -> (Parts, T) {
        (self.parts, self.body)
    }

    /// Consumes the response returning only its body.
    pub fn into_body(self) -> T {
        self.body
    }

    /// Transforms the body, keeping the headers.
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            parts: self.parts,
            body: f(self.body),
        }
    }

    /// The `etag` header, if present and valid UTF-8.
    pub fn etag(&self) -> Option<&str> {
        self.header_str(ETAG)
    }

    /// The `opc-request-id` header returned by OCI services.
    pub fn opc_request_id(&self) -> Option<&str> {
        self.header_str(OPC_REQUEST_ID)
    }

    /// The `opc-next-page` header returned by OCI `list` RPCs.
    pub fn opc_next_page(&self) -> Option<&str> {
        self.header_str(OPC_NEXT_PAGE)
    }

    fn header_str(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Component parts of a response.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct Parts {
    /// The HTTP headers or the gRPC metadata converted to HTTP headers.
    pub headers: http::HeaderMap<http::HeaderValue>,
}

impl Parts {
    pub fn new() -> Self {
        Parts::default()
    }

    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.headers = v.into();
        self
    }
}
