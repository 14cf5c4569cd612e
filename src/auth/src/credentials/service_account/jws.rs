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

//! Self-signed JWTs for service account credentials.

use crate::Result;
use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use gax::error::CredentialsError;
use serde::Serialize;
use std::time::Duration;

/// Backdates `iat`, services reject assertions issued in the future.
pub const CLOCK_SKEW_FUDGE: Duration = Duration::from_secs(10);
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(3600);

/// The claims of a self-signed JWT. Times are seconds since the epoch.
#[derive(Serialize)]
pub struct JwsClaims {
    pub iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: i64,
    pub iat: i64,
    pub sub: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidClaims {
    #[error("the expiration time ({exp}) must be later than the issued-at time ({iat})")]
    ExpiresBeforeIssued { exp: i64, iat: i64 },
    #[error("a self-signed JWT uses an audience or scopes, not both")]
    AudienceAndScopes,
}

impl JwsClaims {
    fn validate(&self) -> std::result::Result<(), InvalidClaims> {
        if self.exp < self.iat {
            return Err(InvalidClaims::ExpiresBeforeIssued {
                exp: self.exp,
                iat: self.iat,
            });
        }
        if self.aud.is_some() && self.scope.is_some() {
            return Err(InvalidClaims::AudienceAndScopes);
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct JwsHeader<'a> {
    pub alg: &'a str,
    pub typ: &'a str,
    pub kid: &'a str,
}

/// Returns `header.claims`, each part base64url encoded. The signature is
/// computed over this string.
pub fn signing_input(header: &JwsHeader, claims: &JwsClaims) -> Result<String> {
    claims
        .validate()
        .map_err(|e| CredentialsError::new(false, e))?;
    Ok(format!("{}.{}", base64_json(header)?, base64_json(claims)?))
}

fn base64_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|e| CredentialsError::new(false, e))?;
    Ok(BASE64_URL_SAFE_NO_PAD.encode(json))
}
