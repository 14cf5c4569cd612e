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

//! Cloud Client Libraries for Rust - Google Authentication Components
//!
//! This crate contains the credential types used to authenticate requests to
//! Google Cloud services, such as BigQuery and IAM. All the types produce a
//! [gax::credentials::Credentials], which the client libraries consume.
//!
//! Most applications use [credentials::Builder], which finds the default
//! credentials for the environment:
//!
//! ```no_run
//! # fn sample() -> Result<(), cloudkit_auth::build_errors::Error> {
//! let credentials = cloudkit_auth::credentials::Builder::default().build()?;
//! # Ok(()) }
//! ```
//!
//! [Authentication methods at Google] is a good introduction on the topic.
//!
//! [Authentication methods at Google]: https://cloud.google.com/docs/authentication

/// Errors created while building credentials.
pub mod build_errors;

/// Types and functions to work with Google Cloud authentication [Credentials].
///
/// [Credentials]: https://cloud.google.com/docs/authentication#credentials
pub mod credentials;

pub(crate) mod constants;
pub(crate) mod token;
pub(crate) mod token_cache;

/// A `Result` alias where the `Err` case is [gax::error::CredentialsError].
pub(crate) type Result<T> = std::result::Result<T, gax::error::CredentialsError>;
