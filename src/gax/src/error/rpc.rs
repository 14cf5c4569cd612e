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

use serde::{Deserialize, Serialize};

/// The error payload returned by a service.
///
/// Google services return an envelope such as
/// `{"error": {"code": 404, "status": "NOT_FOUND", "message": "..."}}`,
/// OCI services return a flat `{"code": "NotAuthorizedOrNotFound",
/// "message": "..."}`. Both are parsed into this type. For OCI errors the
/// symbolic code lands in [status][Status::status] and [code][Status::code]
/// is the HTTP status code of the response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Status {
    /// The HTTP status code.
    pub code: u16,

    /// The symbolic error code, e.g. `NOT_FOUND` or `IncorrectState`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// A developer-facing error message.
    pub message: String,

    /// Additional details, BigQuery reports the error `reason` here.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
}

impl Status {
    /// Sets the value for [code][Status::code].
    pub fn set_code(mut self, v: u16) -> Self {
        self.code = v;
        self
    }

    /// Sets the value for [status][Status::status].
    pub fn set_status<T: Into<String>>(mut self, v: T) -> Self {
        self.status = Some(v.into());
        self
    }

    /// Sets the value for [message][Status::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value for [errors][Status::errors].
    pub fn set_errors<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<ErrorDetail>,
    {
        self.errors = v.into_iter().map(|v| v.into()).collect();
        self
    }

    /// Returns true if any of the error details carries `reason`.
    pub fn has_reason(&self, reason: &str) -> bool {
        self.errors.iter().any(|e| e.reason == reason)
    }
}

/// One entry in the `errors` list of a Google error envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ErrorDetail {
    pub reason: String,
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
}

impl ErrorDetail {
    /// Sets the value for [reason][ErrorDetail::reason].
    pub fn set_reason<T: Into<String>>(mut self, v: T) -> Self {
        self.reason = v.into();
        self
    }

    /// Sets the value for [message][ErrorDetail::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }
}

#[derive(Deserialize)]
struct GoogleEnvelope {
    error: GoogleStatus,
}

#[derive(Deserialize)]
#[serde(default)]
#[derive(Default)]
struct GoogleStatus {
    code: u16,
    status: Option<String>,
    message: String,
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct OciStatus {
    code: String,
    #[serde(default)]
    message: String,
}

impl TryFrom<&bytes::Bytes> for Status {
    type Error = serde_json::Error;

    fn try_from(value: &bytes::Bytes) -> Result<Self, Self::Error> {
        if let Ok(envelope) = serde_json::from_slice::<GoogleEnvelope>(value) {
            let e = envelope.error;
            return Ok(Status {
                code: e.code,
                status: e.status,
                message: e.message,
                errors: e.errors,
            });
        }
        let e = serde_json::from_slice::<OciStatus>(value)?;
        Ok(Status {
            code: 0,
            status: Some(e.code),
            message: e.message,
            errors: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_envelope() -> anyhow::Result<()> {
        let body = bytes::Bytes::from_static(
            br#"{"error": {
                "code": 403,
                "status": "PERMISSION_DENIED",
                "message": "Access Denied",
                "errors": [{"reason": "accessDenied", "message": "Access Denied", "domain": "global"}]
            }}"#,
        );
        let got = Status::try_from(&body)?;
        assert_eq!(got.code, 403);
        assert_eq!(got.status.as_deref(), Some("PERMISSION_DENIED"));
        assert_eq!(got.message, "Access Denied");
        assert!(got.has_reason("accessDenied"), "{got:?}");
        assert!(!got.has_reason("backendError"), "{got:?}");
        assert_eq!(got.errors[0].domain, "global");
        Ok(())
    }

    #[test]
    fn oci_flat() -> anyhow::Result<()> {
        let body = bytes::Bytes::from_static(
            br#"{"code": "NotAuthorizedOrNotFound", "message": "zone not found"}"#,
        );
        let got = Status::try_from(&body)?;
        assert_eq!(got.code, 0);
        assert_eq!(got.status.as_deref(), Some("NotAuthorizedOrNotFound"));
        assert_eq!(got.message, "zone not found");
        assert!(got.errors.is_empty(), "{got:?}");
        Ok(())
    }

    #[test]
    fn not_a_status() {
        let body = bytes::Bytes::from_static(b"<html>bad gateway</html>");
        assert!(Status::try_from(&body).is_err());
        let body = bytes::Bytes::from_static(br#"{"unrelated": true}"#);
        assert!(Status::try_from(&body).is_err());
    }

    #[test]
    fn setters() {
        let got = Status::default()
            .set_code(409_u16)
            .set_status("IncorrectState")
            .set_message("busy")
            .set_errors([ErrorDetail::default().set_reason("r")]);
        assert_eq!(got.code, 409);
        assert_eq!(got.status.as_deref(), Some("IncorrectState"));
        assert_eq!(got.message, "busy");
        assert!(got.has_reason("r"));
    }
}
