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

//! Google Cloud Client Libraries for Rust - BigQuery
//!
//! This crate contains a client for the [BigQuery] v2 REST API. It covers
//! the management of datasets, tables, and jobs, running queries and reading
//! their results, reading table data, and streaming inserts.
//!
//! # Example
//! ```no_run
//! # tokio_test::block_on(async {
//! use cloudkit_bigquery::client::Client;
//! let client = Client::builder().build().await?;
//! let mut query = client
//!     .query("my-project", "SELECT name, number FROM `bigquery-public-data.usa_names.usa_1910_2013` LIMIT 10")
//!     .send()
//!     .await?;
//! query.wait().await?;
//! let mut rows = query.read().await?;
//! while let Some(row) = rows.next().await {
//!     let row = row?;
//!     println!("{:?} {:?}", row.get::<String>("name")?, row.get::<i64>("number")?);
//! }
//! # anyhow::Ok(()) });
//! ```
//!
//! [BigQuery]: https://cloud.google.com/bigquery

pub use gax::Result;
pub use gax::error::Error;

pub mod builder;
pub mod client;
pub mod inserter;
pub mod iterator;
pub mod job;
pub mod model;
pub mod query;
pub mod retry_policy;
pub mod row;
pub mod value;

pub(crate) mod schema;
pub(crate) mod transport;
