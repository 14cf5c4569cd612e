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

//! Request builders for the [Client][crate::client::Client] methods.
//!
//! Each builder collects the request parameters and any per-request options,
//! such as the retry policy. Call `send()` to make the request. Builders for
//! `list` methods also provide `by_page()` and `by_item()` to iterate over
//! all the results.

use crate::Result;
use crate::iterator::RowIterator;
use crate::model;
use crate::transport::{BigQuery, ListJobsParams};
use gax::error::Error;
use gax::options::RequestOptions;
use gax::paginator::{ItemPaginator, Paginator};
use std::sync::Arc;

macro_rules! request_builder {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc(hidden)]
            impl gax::options::internal::RequestBuilder for $name {
                fn request_options(&mut self) -> &mut RequestOptions {
                    &mut self.options
                }
            }
        )*
    };
}

request_builder!(
    CreateDataset,
    GetDataset,
    UpdateDataset,
    DeleteDataset,
    ListDatasets,
    CreateTable,
    GetTable,
    UpdateTable,
    DeleteTable,
    ListTables,
    InsertJob,
    GetJob,
    CancelJob,
    DeleteJob,
    ListJobs,
    ReadTable,
);

/// The request builder for [Client::create_dataset][crate::client::Client::create_dataset] calls.
#[derive(Clone, Debug)]
pub struct CreateDataset {
    inner: Arc<BigQuery>,
    project_id: String,
    dataset: model::Dataset,
    options: RequestOptions,
}

impl CreateDataset {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String) -> Self {
        Self {
            inner,
            project_id,
            dataset: model::Dataset::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sets the dataset to create.
    ///
    /// If the dataset has no reference, the reference is set to the project
    /// of this request and `dataset_id`.
    pub fn set_dataset(mut self, v: model::Dataset) -> Self {
        self.dataset = v;
        self
    }

    /// Sets the id of the new dataset.
    pub fn set_dataset_id<T: Into<String>>(mut self, v: T) -> Self {
        let reference = model::DatasetReference::new(self.project_id.clone(), v);
        self.dataset.dataset_reference = Some(reference);
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Dataset> {
        self.inner
            .insert_dataset(&self.project_id, self.dataset, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::get_dataset][crate::client::Client::get_dataset] calls.
#[derive(Clone, Debug)]
pub struct GetDataset {
    inner: Arc<BigQuery>,
    project_id: String,
    dataset_id: String,
    options: RequestOptions,
}

impl GetDataset {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, dataset_id: String) -> Self {
        Self {
            inner,
            project_id,
            dataset_id,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Dataset> {
        self.inner
            .get_dataset(&self.project_id, &self.dataset_id, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::update_dataset][crate::client::Client::update_dataset] calls.
///
/// The update uses `PATCH` semantics, only the fields present in the dataset
/// are changed. If the dataset carries an etag the update only succeeds if
/// the dataset has not changed since it was read.
#[derive(Clone, Debug)]
pub struct UpdateDataset {
    inner: Arc<BigQuery>,
    project_id: String,
    dataset_id: String,
    dataset: model::Dataset,
    options: RequestOptions,
}

impl UpdateDataset {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, dataset_id: String) -> Self {
        Self {
            inner,
            project_id,
            dataset_id,
            dataset: model::Dataset::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sets the new values for the dataset.
    pub fn set_dataset(mut self, v: model::Dataset) -> Self {
        self.dataset = v;
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Dataset> {
        self.inner
            .patch_dataset(&self.project_id, &self.dataset_id, self.dataset, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::delete_dataset][crate::client::Client::delete_dataset] calls.
#[derive(Clone, Debug)]
pub struct DeleteDataset {
    inner: Arc<BigQuery>,
    project_id: String,
    dataset_id: String,
    delete_contents: bool,
    options: RequestOptions,
}

impl DeleteDataset {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, dataset_id: String) -> Self {
        Self {
            inner,
            project_id,
            dataset_id,
            delete_contents: false,
            options: RequestOptions::default(),
        }
    }

    /// If true, delete all the tables in the dataset. Otherwise deleting a
    /// non-empty dataset fails.
    pub fn set_delete_contents(mut self, v: bool) -> Self {
        self.delete_contents = v;
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        self.inner
            .delete_dataset(
                &self.project_id,
                &self.dataset_id,
                self.delete_contents,
                self.options,
            )
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::list_datasets][crate::client::Client::list_datasets] calls.
///
/// # Example
/// ```
/// # use cloudkit_bigquery::client::Client;
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let mut items = client.list_datasets("my-project").by_item();
///     while let Some(dataset) = items.next().await {
///         println!("{:?}", dataset?.dataset_reference);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ListDatasets {
    inner: Arc<BigQuery>,
    project_id: String,
    all: bool,
    filter: Option<String>,
    max_results: Option<u32>,
    page_token: String,
    options: RequestOptions,
}

impl ListDatasets {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String) -> Self {
        Self {
            inner,
            project_id,
            all: false,
            filter: None,
            max_results: None,
            page_token: String::new(),
            options: RequestOptions::default(),
        }
    }

    /// Include hidden datasets.
    pub fn set_all(mut self, v: bool) -> Self {
        self.all = v;
        self
    }

    /// Filter by label, for example `labels.env:prod`.
    pub fn set_filter<T: Into<String>>(mut self, v: T) -> Self {
        self.filter = Some(v.into());
        self
    }

    pub fn set_max_results(mut self, v: u32) -> Self {
        self.max_results = Some(v);
        self
    }

    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<model::DatasetList> {
        self.inner
            .list_datasets(
                &self.project_id,
                self.all,
                &self.filter,
                self.max_results,
                &self.page_token,
                self.options,
            )
            .await
            .map(gax::response::Response::into_body)
    }

    /// Streams each page in the collection.
    pub fn by_page(self) -> Paginator<model::DatasetList, Error> {
        let token = self.page_token.clone();
        let execute = move |token: String| self.clone().set_page_token(token).send();
        Paginator::new(token, execute)
    }

    /// Streams each item in the collection.
    pub fn by_item(self) -> ItemPaginator<model::DatasetList, Error> {
        self.by_page().items()
    }
}

/// The request builder for [Client::create_table][crate::client::Client::create_table] calls.
#[derive(Clone, Debug)]
pub struct CreateTable {
    inner: Arc<BigQuery>,
    project_id: String,
    dataset_id: String,
    table: model::Table,
    options: RequestOptions,
}

impl CreateTable {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, dataset_id: String) -> Self {
        Self {
            inner,
            project_id,
            dataset_id,
            table: model::Table::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sets the table to create.
    pub fn set_table(mut self, v: model::Table) -> Self {
        self.table = v;
        self
    }

    /// Sets the id of the new table.
    pub fn set_table_id<T: Into<String>>(mut self, v: T) -> Self {
        let reference =
            model::TableReference::new(self.project_id.clone(), self.dataset_id.clone(), v);
        self.table.table_reference = Some(reference);
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Table> {
        self.inner
            .insert_table(&self.project_id, &self.dataset_id, self.table, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::get_table][crate::client::Client::get_table] calls.
#[derive(Clone, Debug)]
pub struct GetTable {
    inner: Arc<BigQuery>,
    reference: model::TableReference,
    options: RequestOptions,
}

impl GetTable {
    pub(crate) fn new(inner: Arc<BigQuery>, reference: model::TableReference) -> Self {
        Self {
            inner,
            reference,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Table> {
        self.inner
            .get_table(&self.reference, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::update_table][crate::client::Client::update_table] calls.
///
/// Like [UpdateDataset], this uses `PATCH` semantics and honors the etag in
/// the table.
#[derive(Clone, Debug)]
pub struct UpdateTable {
    inner: Arc<BigQuery>,
    reference: model::TableReference,
    table: model::Table,
    options: RequestOptions,
}

impl UpdateTable {
    pub(crate) fn new(inner: Arc<BigQuery>, reference: model::TableReference) -> Self {
        Self {
            inner,
            reference,
            table: model::Table::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sets the new values for the table.
    pub fn set_table(mut self, v: model::Table) -> Self {
        self.table = v;
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Table> {
        self.inner
            .patch_table(&self.reference, self.table, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::delete_table][crate::client::Client::delete_table] calls.
#[derive(Clone, Debug)]
pub struct DeleteTable {
    inner: Arc<BigQuery>,
    reference: model::TableReference,
    options: RequestOptions,
}

impl DeleteTable {
    pub(crate) fn new(inner: Arc<BigQuery>, reference: model::TableReference) -> Self {
        Self {
            inner,
            reference,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        self.inner
            .delete_table(&self.reference, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::list_tables][crate::client::Client::list_tables] calls.
#[derive(Clone, Debug)]
pub struct ListTables {
    inner: Arc<BigQuery>,
    project_id: String,
    dataset_id: String,
    max_results: Option<u32>,
    page_token: String,
    options: RequestOptions,
}

impl ListTables {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, dataset_id: String) -> Self {
        Self {
            inner,
            project_id,
            dataset_id,
            max_results: None,
            page_token: String::new(),
            options: RequestOptions::default(),
        }
    }

    pub fn set_max_results(mut self, v: u32) -> Self {
        self.max_results = Some(v);
        self
    }

    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<model::TableList> {
        self.inner
            .list_tables(
                &self.project_id,
                &self.dataset_id,
                self.max_results,
                &self.page_token,
                self.options,
            )
            .await
            .map(gax::response::Response::into_body)
    }

    /// Streams each page in the collection.
    pub fn by_page(self) -> Paginator<model::TableList, Error> {
        let token = self.page_token.clone();
        let execute = move |token: String| self.clone().set_page_token(token).send();
        Paginator::new(token, execute)
    }

    /// Streams each item in the collection.
    pub fn by_item(self) -> ItemPaginator<model::TableList, Error> {
        self.by_page().items()
    }
}

/// The request builder for [Client::insert_job][crate::client::Client::insert_job] calls.
///
/// Prefer [Client::run][crate::client::Client::run], which generates the job
/// id and returns a handle to wait for the job.
#[derive(Clone, Debug)]
pub struct InsertJob {
    inner: Arc<BigQuery>,
    project_id: String,
    job: model::Job,
    options: RequestOptions,
}

impl InsertJob {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String) -> Self {
        Self {
            inner,
            project_id,
            job: model::Job::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sets the job to insert.
    pub fn set_job(mut self, v: model::Job) -> Self {
        self.job = v;
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Job> {
        self.inner
            .insert_job(&self.project_id, self.job, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::get_job][crate::client::Client::get_job] calls.
#[derive(Clone, Debug)]
pub struct GetJob {
    inner: Arc<BigQuery>,
    project_id: String,
    job_id: String,
    location: Option<String>,
    options: RequestOptions,
}

impl GetJob {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, job_id: String) -> Self {
        Self {
            inner,
            project_id,
            job_id,
            location: None,
            options: RequestOptions::default(),
        }
    }

    /// The location of the job, required for jobs outside the `US` and `EU`
    /// multi-regions.
    pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
        self.location = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Job> {
        self.inner
            .get_job(&self.project_id, &self.job_id, &self.location, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::cancel_job][crate::client::Client::cancel_job] calls.
///
/// Cancellation is asynchronous, the returned job may still be running.
#[derive(Clone, Debug)]
pub struct CancelJob {
    inner: Arc<BigQuery>,
    project_id: String,
    job_id: String,
    location: Option<String>,
    options: RequestOptions,
}

impl CancelJob {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, job_id: String) -> Self {
        Self {
            inner,
            project_id,
            job_id,
            location: None,
            options: RequestOptions::default(),
        }
    }

    pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
        self.location = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::JobCancelResponse> {
        self.inner
            .cancel_job(&self.project_id, &self.job_id, &self.location, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::delete_job][crate::client::Client::delete_job] calls.
///
/// Deletes the job metadata, the job must be complete.
#[derive(Clone, Debug)]
pub struct DeleteJob {
    inner: Arc<BigQuery>,
    project_id: String,
    job_id: String,
    location: Option<String>,
    options: RequestOptions,
}

impl DeleteJob {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, job_id: String) -> Self {
        Self {
            inner,
            project_id,
            job_id,
            location: None,
            options: RequestOptions::default(),
        }
    }

    pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
        self.location = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        self.inner
            .delete_job(&self.project_id, &self.job_id, &self.location, self.options)
            .await
            .map(gax::response::Response::into_body)
    }
}

/// The request builder for [Client::list_jobs][crate::client::Client::list_jobs] calls.
///
/// The results always use the `full` projection.
#[derive(Clone, Debug)]
pub struct ListJobs {
    inner: Arc<BigQuery>,
    project_id: String,
    params: ListJobsParams,
    page_token: String,
    options: RequestOptions,
}

impl ListJobs {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String) -> Self {
        Self {
            inner,
            project_id,
            params: ListJobsParams::default(),
            page_token: String::new(),
            options: RequestOptions::default(),
        }
    }

    /// List the jobs of all users in the project, requires owner
    /// permissions.
    pub fn set_all_users(mut self, v: bool) -> Self {
        self.params.all_users = v;
        self
    }

    /// Only list jobs in these states: `pending`, `running` or `done`.
    pub fn set_state_filter<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.state_filter = v.into_iter().map(Into::into).collect();
        self
    }

    /// Only list jobs created at or after this time, in milliseconds since
    /// the epoch.
    pub fn set_min_creation_time(mut self, v: i64) -> Self {
        self.params.min_creation_time = Some(v);
        self
    }

    /// Only list jobs created at or before this time, in milliseconds since
    /// the epoch.
    pub fn set_max_creation_time(mut self, v: i64) -> Self {
        self.params.max_creation_time = Some(v);
        self
    }

    /// Only list the child jobs of this script job.
    pub fn set_parent_job_id<T: Into<String>>(mut self, v: T) -> Self {
        self.params.parent_job_id = Some(v.into());
        self
    }

    pub fn set_max_results(mut self, v: u32) -> Self {
        self.params.max_results = Some(v);
        self
    }

    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<model::JobList> {
        self.inner
            .list_jobs(&self.project_id, &self.params, &self.page_token, self.options)
            .await
            .map(gax::response::Response::into_body)
    }

    /// Streams each page in the collection.
    pub fn by_page(self) -> Paginator<model::JobList, Error> {
        let token = self.page_token.clone();
        let execute = move |token: String| self.clone().set_page_token(token).send();
        Paginator::new(token, execute)
    }

    /// Streams each item in the collection.
    pub fn by_item(self) -> ItemPaginator<model::JobList, Error> {
        self.by_page().items()
    }
}

/// The request builder for [Client::read_table][crate::client::Client::read_table] calls.
///
/// # Example
/// ```
/// # use cloudkit_bigquery::client::Client;
/// # use cloudkit_bigquery::model::TableReference;
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let mut rows = client
///         .read_table(TableReference::new("my-project", "my_dataset", "my_table"))
///         .set_max_results(1000)
///         .send()
///         .await?;
///     while let Some(row) = rows.next().await {
///         println!("{:?}", row?.to_value());
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ReadTable {
    inner: Arc<BigQuery>,
    reference: model::TableReference,
    max_results: Option<u32>,
    start_index: Option<u64>,
    options: RequestOptions,
}

impl ReadTable {
    pub(crate) fn new(inner: Arc<BigQuery>, reference: model::TableReference) -> Self {
        Self {
            inner,
            reference,
            max_results: None,
            start_index: None,
            options: RequestOptions::default(),
        }
    }

    /// The maximum number of rows in each page.
    pub fn set_max_results(mut self, v: u32) -> Self {
        self.max_results = Some(v);
        self
    }

    /// Start reading at this (zero-based) row.
    pub fn set_start_index(mut self, v: u64) -> Self {
        self.start_index = Some(v);
        self
    }

    /// Fetches the table schema and the first page of rows.
    pub async fn send(self) -> Result<RowIterator> {
        RowIterator::read_table(
            self.inner,
            self.reference,
            self.max_results,
            self.start_index,
            self.options,
        )
        .await
    }
}
