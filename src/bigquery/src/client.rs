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

//! Contains the BigQuery client and related types.

use crate::Result;
use crate::builder::{
    CancelJob, CreateDataset, CreateTable, DeleteDataset, DeleteJob, DeleteTable, GetDataset,
    GetJob, GetTable, InsertJob, ListDatasets, ListJobs, ListTables, ReadTable, UpdateDataset,
    UpdateTable,
};
use crate::inserter::Inserter;
use crate::job::{JobConfig, JobHandle};
use crate::model::TableReference;
use crate::query::QueryBuilder;
use crate::transport::BigQuery;
use gax::options::RequestOptions;
use std::sync::Arc;

/// Implements a client for the BigQuery v2 API.
///
/// # Example
/// ```
/// # tokio_test::block_on(async {
/// # use cloudkit_bigquery::client::Client;
/// # use gax::credentials::AnonymousCredentials;
/// let client = Client::builder()
///     .with_credentials(AnonymousCredentials::new())
///     .build()
///     .await?;
/// // use `client` to make requests to BigQuery.
/// # anyhow::Ok(()) });
/// ```
///
/// # Configuration
///
/// Use [Client::builder] to customize the client. Without credentials, the
/// client uses the default credentials, see [auth::credentials::Builder].
/// Without a retry policy, the client uses
/// [BigQueryRetry][crate::retry_policy::BigQueryRetry] limited to 60 seconds.
///
/// # Pooling and Cloning
///
/// `Client` holds a connection pool internally, it is advised to create one
/// and then reuse it. Cloning a client is cheap, the clones share the pool.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<BigQuery>,
}

impl Client {
    /// Returns a builder for [Client].
    ///
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// # use cloudkit_bigquery::client::Client;
    /// let client = Client::builder().build().await?;
    /// # anyhow::Ok(()) });
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new(client_builder::Factory)
    }

    pub(crate) async fn new(
        config: gax::client_builder::ClientConfig,
    ) -> gax::client_builder::Result<Self> {
        let inner = BigQuery::new(config).await?;
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates a dataset.
    ///
    /// ```
    /// # use cloudkit_bigquery::client::Client;
    /// use cloudkit_bigquery::model::{Dataset, DatasetReference};
    /// async fn sample(client: &Client) -> gax::Result<()> {
    ///     let dataset = client
    ///         .create_dataset("my-project")
    ///         .set_dataset(Dataset::new(DatasetReference::new("my-project", "my_dataset"))
    ///             .set_location("US"))
    ///         .send()
    ///         .await?;
    ///     println!("{dataset:?}");
    ///     Ok(())
    /// }
    /// ```
    pub fn create_dataset<P: Into<String>>(&self, project_id: P) -> CreateDataset {
        CreateDataset::new(self.inner.clone(), project_id.into())
    }

    pub fn get_dataset<P, D>(&self, project_id: P, dataset_id: D) -> GetDataset
    where
        P: Into<String>,
        D: Into<String>,
    {
        GetDataset::new(self.inner.clone(), project_id.into(), dataset_id.into())
    }

    /// Updates the fields set in the dataset.
    ///
    /// If the dataset has an etag the request fails unless the dataset is
    /// unchanged since it was read.
    pub fn update_dataset<P, D>(&self, project_id: P, dataset_id: D) -> UpdateDataset
    where
        P: Into<String>,
        D: Into<String>,
    {
        UpdateDataset::new(self.inner.clone(), project_id.into(), dataset_id.into())
    }

    pub fn delete_dataset<P, D>(&self, project_id: P, dataset_id: D) -> DeleteDataset
    where
        P: Into<String>,
        D: Into<String>,
    {
        DeleteDataset::new(self.inner.clone(), project_id.into(), dataset_id.into())
    }

    /// Lists the datasets in a project.
    ///
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
    pub fn list_datasets<P: Into<String>>(&self, project_id: P) -> ListDatasets {
        ListDatasets::new(self.inner.clone(), project_id.into())
    }

    pub fn create_table<P, D>(&self, project_id: P, dataset_id: D) -> CreateTable
    where
        P: Into<String>,
        D: Into<String>,
    {
        CreateTable::new(self.inner.clone(), project_id.into(), dataset_id.into())
    }

    pub fn get_table(&self, reference: TableReference) -> GetTable {
        GetTable::new(self.inner.clone(), reference)
    }

    pub fn update_table(&self, reference: TableReference) -> UpdateTable {
        UpdateTable::new(self.inner.clone(), reference)
    }

    pub fn delete_table(&self, reference: TableReference) -> DeleteTable {
        DeleteTable::new(self.inner.clone(), reference)
    }

    pub fn list_tables<P, D>(&self, project_id: P, dataset_id: D) -> ListTables
    where
        P: Into<String>,
        D: Into<String>,
    {
        ListTables::new(self.inner.clone(), project_id.into(), dataset_id.into())
    }

    /// Inserts a job from its raw configuration.
    ///
    /// Most applications should prefer [run][Client::run].
    pub fn insert_job<P: Into<String>>(&self, project_id: P) -> InsertJob {
        InsertJob::new(self.inner.clone(), project_id.into())
    }

    pub fn get_job<P, J>(&self, project_id: P, job_id: J) -> GetJob
    where
        P: Into<String>,
        J: Into<String>,
    {
        GetJob::new(self.inner.clone(), project_id.into(), job_id.into())
    }

    /// Requests the cancellation of a job.
    ///
    /// The job may still complete, use [get_job][Client::get_job] to check
    /// its final state.
    pub fn cancel_job<P, J>(&self, project_id: P, job_id: J) -> CancelJob
    where
        P: Into<String>,
        J: Into<String>,
    {
        CancelJob::new(self.inner.clone(), project_id.into(), job_id.into())
    }

    /// Deletes the metadata of a completed job.
    pub fn delete_job<P, J>(&self, project_id: P, job_id: J) -> DeleteJob
    where
        P: Into<String>,
        J: Into<String>,
    {
        DeleteJob::new(self.inner.clone(), project_id.into(), job_id.into())
    }

    pub fn list_jobs<P: Into<String>>(&self, project_id: P) -> ListJobs {
        ListJobs::new(self.inner.clone(), project_id.into())
    }

    /// Starts a query, load, extract, or copy job.
    ///
    /// ```
    /// # use cloudkit_bigquery::client::Client;
    /// use cloudkit_bigquery::job::{JobConfig, LoadConfig};
    /// use cloudkit_bigquery::model::TableReference;
    /// async fn sample(client: &Client) -> gax::Result<()> {
    ///     let config = LoadConfig::new(
    ///         ["gs://my-bucket/data-*.csv"],
    ///         TableReference::new("my-project", "my_dataset", "my_table"),
    ///     )
    ///     .with_job_id_prefix("load_");
    ///     let mut job = client.run("my-project", config).await?;
    ///     job.wait().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run<P, C>(&self, project_id: P, config: C) -> Result<JobHandle>
    where
        P: Into<String>,
        C: JobConfig,
    {
        self.run_with_options(project_id, config, RequestOptions::default())
            .await
    }

    /// Like [run][Client::run], with custom request options.
    pub async fn run_with_options<P, C>(
        &self,
        project_id: P,
        config: C,
        options: RequestOptions,
    ) -> Result<JobHandle>
    where
        P: Into<String>,
        C: JobConfig,
    {
        crate::job::run(self.inner.clone(), project_id.into(), config, options).await
    }

    /// Runs a query using `jobs.query`.
    ///
    /// See [QueryBuilder] for an example.
    pub fn query<P, S>(&self, project_id: P, sql: S) -> QueryBuilder
    where
        P: Into<String>,
        S: Into<String>,
    {
        QueryBuilder::new(self.inner.clone(), project_id.into(), sql.into())
    }

    /// Reads the rows of a table.
    pub fn read_table(&self, reference: TableReference) -> ReadTable {
        ReadTable::new(self.inner.clone(), reference)
    }

    /// Returns an [Inserter] to stream rows into a table.
    pub fn inserter<P, D, T>(&self, project_id: P, dataset_id: D, table_id: T) -> Inserter
    where
        P: Into<String>,
        D: Into<String>,
        T: Into<String>,
    {
        Inserter::new(
            self.inner.clone(),
            TableReference::new(project_id, dataset_id, table_id),
        )
    }
}

/// A builder for [Client].
///
/// ```
/// # tokio_test::block_on(async {
/// # use cloudkit_bigquery::client::{Client, ClientBuilder};
/// # use gax::credentials::AnonymousCredentials;
/// let builder: ClientBuilder = Client::builder();
/// let client = builder
///     .with_endpoint("https://bigquery.googleapis.com")
///     .with_credentials(AnonymousCredentials::new())
///     .build()
///     .await?;
/// # anyhow::Ok(()) });
/// ```
pub type ClientBuilder = gax::client_builder::ClientBuilder<client_builder::Factory>;

pub(crate) mod client_builder {
    use super::Client;
    use gax::client_builder::{ClientConfig, Error, Result};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    pub struct Factory;

    impl gax::client_builder::ClientFactory for Factory {
        type Client = Client;
        async fn build(self, mut config: ClientConfig) -> Result<Self::Client> {
            if config.cred.is_none() {
                let cred = auth::credentials::Builder::default()
                    .build()
                    .map_err(Error::cred)?;
                config.cred = Some(cred);
            }
            if config.retry_policy.is_none() {
                config.retry_policy = Some(Arc::new(crate::retry_policy::bigquery_default()));
            }
            Client::new(config).await
        }
    }
}
