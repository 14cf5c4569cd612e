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

pub mod service_account;

mod access_token;

pub use access_token::AccessTokenCredentials;
pub use gax::credentials::{Credentials, CredentialsProvider};

use crate::build_errors::Error as BuilderError;
use crate::constants::{ACCESS_TOKEN_VAR, CREDENTIALS_FILE_VAR};
use serde_json::Value;

/// A `Result` alias for credentials builders.
pub type BuildResult<T> = std::result::Result<T, BuilderError>;

/// Creates the default credentials for the environment.
///
/// The builder checks, in order:
/// - `GOOGLE_OAUTH_ACCESS_TOKEN`: a static access token, see
///   [AccessTokenCredentials].
/// - `GOOGLE_APPLICATION_CREDENTIALS`: the path of a service account key file,
///   see [service_account::Builder].
///
/// If neither variable is set [build][Builder::build] returns an error where
/// [is_not_found][BuilderError::is_not_found] is true.
#[derive(Debug, Default)]
pub struct Builder {
    scopes: Option<Vec<String>>,
    quota_project_id: Option<String>,
}

impl Builder {
    /// Sets the scopes used with service account credentials.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the [quota project] for the credentials.
    ///
    /// [quota project]: https://cloud.google.com/docs/quotas/quota-project
    pub fn with_quota_project_id<S: Into<String>>(mut self, quota_project_id: S) -> Self {
        self.quota_project_id = Some(quota_project_id.into());
        self
    }

    /// Finds and loads the default credentials.
    pub fn build(self) -> BuildResult<Credentials> {
        if let Some(token) = non_empty_var(ACCESS_TOKEN_VAR) {
            tracing::debug!("using access token from {ACCESS_TOKEN_VAR}");
            let creds = AccessTokenCredentials::new(token);
            let creds = match self.quota_project_id {
                Some(qp) => creds.with_quota_project_id(qp),
                None => creds,
            };
            return Ok(creds.into());
        }
        let Some(path) = non_empty_var(CREDENTIALS_FILE_VAR) else {
            return Err(BuilderError::not_found());
        };
        tracing::debug!("loading credentials from {path}");
        let contents =
            std::fs::read_to_string(&path).map_err(|e| BuilderError::loading(&path, e))?;
        let js = serde_json::from_str::<Value>(&contents).map_err(BuilderError::parsing)?;
        self.build_from_json(js)
    }

    fn build_from_json(self, js: Value) -> BuildResult<Credentials> {
        match js.get("type").and_then(Value::as_str) {
            Some("service_account") => {}
            Some(t) => return Err(BuilderError::unknown_type(t)),
            None => {
                return Err(BuilderError::parsing(
                    "missing `type` field in the credentials",
                ));
            }
        };
        let key = serde_json::from_value::<service_account::ServiceAccountKey>(js)
            .map_err(BuilderError::parsing)?;
        let builder = service_account::Builder::new(key);
        let builder = match self.scopes {
            Some(scopes) => builder.with_scopes(scopes),
            None => builder,
        };
        let builder = match self.quota_project_id {
            Some(qp) => builder.with_quota_project_id(qp),
            None => builder,
        };
        builder.build()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
