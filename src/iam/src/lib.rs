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

//! Google Cloud Client Libraries for Rust - IAM
//!
//! This crate contains a client for the [IAM] v1 REST API: service
//! accounts and their keys, IAM policies, and roles.
//!
//! # Example
//! ```no_run
//! # tokio_test::block_on(async {
//! use cloudkit_iam::client::Client;
//! use cloudkit_iam::policy::{UpdateConfig, update_iam_policy};
//! let client = Client::builder().build().await?;
//! let account = client
//!     .get_service_account("sa@my-project.iam.gserviceaccount.com")
//!     .send()
//!     .await?;
//! let resource = account.name.unwrap_or_default();
//! let policy = update_iam_policy(&client, &resource, |p| {
//!     p.add_member("roles/iam.serviceAccountUser", "user:alice@example.com")
//! }, UpdateConfig::default()).await?;
//! println!("{policy:?}");
//! # anyhow::Ok(()) });
//! ```
//!
//! [IAM]: https://cloud.google.com/iam

pub use gax::Result;
pub use gax::error::Error;

pub mod builder;
pub mod client;
pub mod model;
pub mod names;
pub mod policy;

pub(crate) mod transport;
