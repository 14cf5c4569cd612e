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

use std::sync::Arc;

type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// A failure to produce the authentication headers for a request.
///
/// Both the Google token providers and the OCI request signer report this
/// type. A transient error, like a timeout talking to a token endpoint, may
/// clear on a later attempt. A permanent one, like a malformed private key,
/// will not. Retry policies retry transient credential errors even for
/// non-idempotent requests, as nothing was sent.
#[derive(Clone, Debug)]
pub struct CredentialsError {
    is_transient: bool,
    detail: Detail,
}

#[derive(Clone, Debug)]
enum Detail {
    Message(String),
    Source(SharedError),
}

impl CredentialsError {
    /// Wraps `source`.
    pub fn new<T: std::error::Error + Send + Sync + 'static>(is_transient: bool, source: T) -> Self {
        Self {
            is_transient,
            detail: Detail::Source(Arc::new(source)),
        }
    }

    /// An error described by `message` alone.
    pub fn from_msg<T: Into<String>>(is_transient: bool, message: T) -> Self {
        Self {
            is_transient,
            detail: Detail::Message(message.into()),
        }
    }

    /// True if a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        self.is_transient
    }
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = if self.is_transient {
            "transient"
        } else {
            "permanent"
        };
        match &self.detail {
            Detail::Message(m) => write!(f, "{class} credentials error: {m}"),
            Detail::Source(e) => write!(f, "{class} credentials error: {e}"),
        }
    }
}

impl std::error::Error for CredentialsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.detail {
            Detail::Message(_) => None,
            Detail::Source(e) => Some(e.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn wraps_source() {
        let got = CredentialsError::new(true, std::io::Error::other("metadata timeout"));
        assert!(got.is_transient(), "{got:?}");
        assert!(got.source().is_some(), "{got:?}");
        assert_eq!(got.to_string(), "transient credentials error: metadata timeout");
    }

    #[test]
    fn from_message() {
        let got = CredentialsError::from_msg(false, "bad key");
        assert!(!got.is_transient(), "{got:?}");
        assert!(got.source().is_none(), "{got:?}");
        assert_eq!(got.to_string(), "permanent credentials error: bad key");
    }

    #[test]
    fn clones_share_the_source() {
        let got = CredentialsError::new(false, std::io::Error::other("test-only"));
        let clone = got.clone();
        assert_eq!(clone.to_string(), got.to_string());
    }
}
