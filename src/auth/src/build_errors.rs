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

//! Errors returned while creating credentials.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A problem creating credentials.
///
/// Use the predicates to tell a missing configuration, which may be
/// expected in some environments, from a broken one.
#[derive(Debug)]
pub struct Error {
    kind: Kind,
    context: Option<String>,
    source: Option<BoxError>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Kind {
    Loading,
    Parsing,
    UnknownType,
    NotFound,
}

impl Error {
    /// The credentials file could not be read.
    pub fn is_loading(&self) -> bool {
        self.kind == Kind::Loading
    }

    /// The credentials, or their private key, are malformed.
    pub fn is_parsing(&self) -> bool {
        self.kind == Kind::Parsing
    }

    /// The credentials file has a `type` this crate does not support.
    pub fn is_unknown_type(&self) -> bool {
        self.kind == Kind::UnknownType
    }

    /// No default credentials are configured.
    pub fn is_not_found(&self) -> bool {
        self.kind == Kind::NotFound
    }

    pub(crate) fn loading<P: Into<String>, T: Into<BoxError>>(path: P, source: T) -> Self {
        Self {
            kind: Kind::Loading,
            context: Some(path.into()),
            source: Some(source.into()),
        }
    }

    pub(crate) fn parsing<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: Kind::Parsing,
            context: None,
            source: Some(source.into()),
        }
    }

    pub(crate) fn unknown_type<T: Into<String>>(credentials_type: T) -> Self {
        Self {
            kind: Kind::UnknownType,
            context: Some(credentials_type.into()),
            source: None,
        }
    }

    pub(crate) fn not_found() -> Self {
        Self {
            kind: Kind::NotFound,
            context: None,
            source: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let context = self.context.as_deref().unwrap_or_default();
        match self.kind {
            Kind::Loading => write!(f, "cannot read the credentials file {context}")?,
            Kind::Parsing => write!(f, "cannot parse the credentials")?,
            Kind::UnknownType => write!(f, "unsupported credentials type `{context}`")?,
            Kind::NotFound => {
                return write!(
                    f,
                    "no default credentials found, set {} or {}",
                    crate::constants::ACCESS_TOKEN_VAR,
                    crate::constants::CREDENTIALS_FILE_VAR
                );
            }
        }
        match &self.source {
            Some(e) => write!(f, ": {e}"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
