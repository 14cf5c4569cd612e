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

//! Bearer tokens and the providers that mint them.

use crate::Result;
use crate::constants::QUOTA_PROJECT_KEY;
use gax::error::CredentialsError;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use std::time::Duration;
use tokio::time::Instant;

/// An OAuth2 bearer token, or a self-signed JWT used as one.
#[derive(Clone, PartialEq)]
pub(crate) struct BearerToken {
    pub value: String,
    /// `None` for tokens that never expire, such as static access tokens.
    pub expires_at: Option<Instant>,
}

impl BearerToken {
    pub fn new<T: Into<String>>(value: T, expires_at: Option<Instant>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Returns true if the token is no longer valid at `now + margin`.
    pub fn expires_within(&self, now: Instant, margin: Duration) -> bool {
        self.expires_at.is_some_and(|e| e <= now + margin)
    }

    /// Returns the `authorization` header, and the quota project header
    /// when `quota_project_id` is set.
    pub fn headers(&self, quota_project_id: Option<&str>) -> Result<HeaderMap> {
        let mut authorization = header_value(&format!("Bearer {}", self.value))?;
        authorization.set_sensitive(true);
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(AUTHORIZATION, authorization);
        if let Some(project) = quota_project_id {
            headers.insert(HeaderName::from_static(QUOTA_PROJECT_KEY), header_value(project)?);
        }
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| CredentialsError::new(false, e))
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"[censored]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[async_trait::async_trait]
pub(crate) trait TokenProvider: std::fmt::Debug + Send + Sync {
    async fn token(&self) -> Result<BearerToken>;
}
