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

//! Cloud APIs helpers.
//!
//! This crate contains the types and functions shared by the BigQuery, IAM,
//! and OCI DNS client libraries: the error type, the retry loop and its
//! policies, the polling loop used for long-running jobs, the paginator used
//! by `list` RPCs, and the HTTP transport.
//!
//! Applications rarely need to use this crate directly, except to customize
//! retry or polling behavior, or to inspect errors.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions wrapping RPCs.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by the client libraries.
pub mod error;

/// Types and traits to provide authentication headers for each request.
pub mod credentials;

/// Defines some types and traits to consume `list` RPCs as a stream of pages
/// or as a stream of items.
pub mod paginator;

pub mod backoff_policy;
pub mod client_builder;
pub mod exponential_backoff;
pub mod options;
pub mod polling;
pub mod polling_backoff_policy;
pub mod polling_error_policy;
pub mod response;
pub mod retry_loop_internal;
pub mod retry_policy;
pub mod retry_result;

/// The HTTP transport shared by all the client libraries.
pub mod http;

mod macros;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
