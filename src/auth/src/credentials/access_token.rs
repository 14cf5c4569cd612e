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
use crate::token::BearerToken;
use gax::credentials::CredentialsProvider;
use http::HeaderMap;

/// Credentials holding a static OAuth2 access token.
///
/// The token is sent as-is and never refreshed. Use these credentials with
/// tokens obtained from `gcloud auth print-access-token`, or from some other
/// service the application trusts.
#[derive(Clone)]
pub struct AccessTokenCredentials {
    token: String,
    quota_project_id: Option<String>,
}

impl AccessTokenCredentials {
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self {
            token: token.into(),
            quota_project_id: None,
        }
    }

    /// Sets the [quota project] for these credentials.
    ///
    /// [quota project]: https://cloud.google.com/docs/quotas/quota-project
    pub fn with_quota_project_id<T: Into<String>>(mut self, v: T) -> Self {
        self.quota_project_id = Some(v.into());
        self
    }
}

impl std::fmt::Debug for AccessTokenCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenCredentials")
            .field("token", &"[censored]")
            .field("quota_project_id", &self.quota_project_id)
            .finish()
    }
}

impl CredentialsProvider for AccessTokenCredentials {
    async fn headers(&self, _request: &reqwest::Request) -> Result<HeaderMap> {
        BearerToken::new(self.token.as_str(), None).headers(self.quota_project_id.as_deref())
    }
}
