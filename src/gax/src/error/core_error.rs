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

use super::CredentialsError;
use super::rpc::Status;
use bytes::Bytes;
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error type returned by every RPC in the client libraries.
///
/// An error may originate in the service, in the HTTP transport, in the
/// credentials, in the retry or polling loops, or while formatting the
/// request. Use the `is_*()` predicates to classify the error, and
/// [status()][Error::status], [http_status_code()][Error::http_status_code]
/// and [http_headers()][Error::http_headers] to inspect what the service
/// returned. Errors generated in the client carry their cause in
/// [source()][std::error::Error::source].
///
/// # Example
/// ```
/// use cloudkit_gax::error::Error;
/// # use cloudkit_gax::error::rpc::Status;
/// fn report(result: Result<String, Error>) {
///     match result {
///         Ok(v) => println!("got {v}"),
///         Err(e) if e.http_status_code() == Some(404) => println!("not found"),
///         Err(e) if e.is_timeout() => println!("deadline exceeded: {e}"),
///         Err(e) => println!("failed: {e}"),
///     }
/// }
/// report(Err(Error::service(Status::default().set_code(404))));
/// ```
#[derive(Debug)]
pub struct Error {
    kind: Kind,
    status: Option<Box<Status>>,
    http: Option<Box<HttpMetadata>>,
    source: Option<BoxError>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Kind {
    Binding,
    Serialization,
    Deserialization,
    Authentication,
    Timeout,
    Exhausted,
    Io,
    Http,
    Service,
}

#[derive(Debug, Default)]
struct HttpMetadata {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    payload: Option<Bytes>,
}

impl Error {
    fn caused_by<T: Into<BoxError>>(kind: Kind, source: T) -> Self {
        Self {
            kind,
            status: None,
            http: None,
            source: Some(source.into()),
        }
    }

    /// An error payload returned by the service.
    ///
    /// ```
    /// use cloudkit_gax::error::Error;
    /// use cloudkit_gax::error::rpc::Status;
    /// let status = Status::default().set_code(404).set_message("NOT FOUND");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        Self::service_with_http_metadata(status, None, None)
    }

    /// An error payload returned by the service, with the HTTP status code
    /// and headers of the response that carried it.
    pub fn service_with_http_metadata(
        status: Status,
        status_code: Option<u16>,
        headers: Option<HeaderMap>,
    ) -> Self {
        let http = (status_code.is_some() || headers.is_some()).then(|| {
            Box::new(HttpMetadata {
                status_code,
                headers,
                payload: None,
            })
        });
        Self {
            kind: Kind::Service,
            status: Some(Box::new(status)),
            http,
            source: None,
        }
    }

    /// An HTTP error response whose body is not a service error payload.
    ///
    /// Proxies and load balancers produce these.
    pub fn http(status_code: u16, headers: HeaderMap, payload: Bytes) -> Self {
        Self {
            kind: Kind::Http,
            status: None,
            http: Some(Box::new(HttpMetadata {
                status_code: Some(status_code),
                headers: Some(headers),
                payload: Some(payload),
            })),
            source: None,
        }
    }

    /// The request failed without a response, e.g. the connection dropped.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self::caused_by(Kind::Io, source)
    }

    /// The attempt ran past its deadline.
    ///
    /// ```
    /// use std::error::Error as _;
    /// use cloudkit_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self::caused_by(Kind::Timeout, source)
    }

    /// A retry or polling policy stopped the loop. `source` is usually the
    /// last error seen.
    ///
    /// ```
    /// use cloudkit_gax::error::Error;
    /// let error = Error::exhausted("too many attempts");
    /// assert!(error.is_exhausted());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self::caused_by(Kind::Exhausted, source)
    }

    /// The request body could not be encoded.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self::caused_by(Kind::Serialization, source)
    }

    /// The response body could not be decoded.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self::caused_by(Kind::Deserialization, source)
    }

    /// A required request field is missing or cannot be used in the URL.
    pub fn binding<T: Into<BoxError>>(source: T) -> Self {
        Self::caused_by(Kind::Binding, source)
    }

    /// The credentials could not produce the request headers.
    pub fn authentication(source: CredentialsError) -> Self {
        Self::caused_by(Kind::Authentication, source)
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == Kind::Timeout
    }

    /// True if a policy ended the retry or polling loop.
    pub fn is_exhausted(&self) -> bool {
        self.kind == Kind::Exhausted
    }

    pub fn is_serialization(&self) -> bool {
        self.kind == Kind::Serialization
    }

    pub fn is_deserialization(&self) -> bool {
        self.kind == Kind::Deserialization
    }

    pub fn is_binding(&self) -> bool {
        self.kind == Kind::Binding
    }

    pub fn is_authentication(&self) -> bool {
        self.kind == Kind::Authentication
    }

    /// True if no response was received.
    pub fn is_io(&self) -> bool {
        self.kind == Kind::Io
    }

    /// True for I/O errors, and for HTTP errors without a service payload.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, Kind::Io | Kind::Http)
    }

    /// The error payload returned by the service, if any.
    ///
    /// ```
    /// use cloudkit_gax::error::{Error, rpc::Status};
    /// let error = Error::service(Status::default().set_code(404));
    /// if let Some(status) = error.status() {
    ///     println!("{} details: {:?}", status.code, status.errors);
    /// }
    /// ```
    pub fn status(&self) -> Option<&Status> {
        self.status.as_deref()
    }

    pub fn http_status_code(&self) -> Option<u16> {
        self.http.as_ref().and_then(|h| h.status_code)
    }

    /// The response headers, if any.
    ///
    /// OCI services return an `opc-request-id` header, include it in any
    /// support request.
    pub fn http_headers(&self) -> Option<&HeaderMap> {
        self.http.as_ref().and_then(|h| h.headers.as_ref())
    }

    /// The raw body of an HTTP error without a service payload.
    pub fn http_payload(&self) -> Option<&Bytes> {
        self.http.as_ref().and_then(|h| h.payload.as_ref())
    }

    /// True if the credentials failed with a transient error.
    ///
    /// Nothing was sent to the service, so any request may be retried.
    pub fn is_transient_and_before_rpc(&self) -> bool {
        self.kind == Kind::Authentication
            && self
                .source
                .as_ref()
                .and_then(|e| e.downcast_ref::<CredentialsError>())
                .is_some_and(CredentialsError::is_transient)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(status) = &self.status {
            let symbol = status.status.as_deref().unwrap_or("UNKNOWN");
            return write!(
                f,
                "the service returned {symbol} ({}): {}",
                status.code, status.message
            );
        }
        if let Some(HttpMetadata {
            status_code: Some(code),
            payload: Some(body),
            ..
        }) = self.http.as_deref()
        {
            return match std::str::from_utf8(body) {
                Ok(text) => write!(f, "HTTP error [{code}]: {text}"),
                Err(_) => write!(f, "HTTP error [{code}]: {body:?}"),
            };
        }
        let prefix = match self.kind {
            Kind::Binding => "cannot build the request URL: ",
            Kind::Serialization => "cannot serialize the request: ",
            Kind::Deserialization => "cannot deserialize the response: ",
            Kind::Authentication => "cannot create the authentication headers: ",
            Kind::Timeout => "the attempt timed out: ",
            Kind::Io => "the request did not complete: ",
            Kind::Exhausted | Kind::Http | Kind::Service => "",
        };
        match &self.source {
            Some(e) => write!(f, "{prefix}{e}"),
            None => write!(f, "{prefix}unknown error"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}
