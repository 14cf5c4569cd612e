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

//! Cloud Client Libraries for Rust - OCI DNS
//!
//! This crate contains a client for the [OCI DNS] REST API: zones, their
//! records, and traffic steering policies.
//!
//! Requests are signed with the API key from the OCI configuration file,
//! see [signer]. Mutations carry an `opc-retry-token`, so the client can
//! safely retry them, see [retry_policy].
//!
//! # Example
//! ```no_run
//! # tokio_test::block_on(async {
//! use cloudkit_oci_dns::client::Client;
//! use cloudkit_oci_dns::model::{RecordDetails, RecordOperation};
//! let client = Client::builder().build().await?;
//! let mut zones = client
//!     .list_zones("ocid1.compartment.oc1..aaa")
//!     .set_name_contains("example")
//!     .by_item();
//! while let Some(zone) = zones.next().await {
//!     let zone = zone?;
//!     println!("{:?} serial={:?}", zone.name, zone.serial);
//! }
//! let record = RecordDetails::new("www.example.com", "A", "192.0.2.1", 300);
//! client
//!     .patch_zone_records("example.com", [RecordOperation::add(record)])
//!     .send()
//!     .await?;
//! # anyhow::Ok(()) });
//! ```
//!
//! [OCI DNS]: https://docs.oracle.com/en-us/iaas/Content/DNS/Concepts/dnszonemanagement.htm

pub use gax::Result;
pub use gax::error::Error;

pub mod builder;
pub mod client;
pub mod model;
pub mod retry_policy;
pub mod signer;

pub(crate) mod config;
pub(crate) mod transport;
