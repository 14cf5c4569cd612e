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

//! Run query, load, extract and copy jobs, and wait for them to complete.
//!
//! # Example
//! ```no_run
//! # use cloudkit_bigquery::client::Client;
//! use cloudkit_bigquery::job::{JobConfig, LoadConfig};
//! use cloudkit_bigquery::model::{SourceFormat, TableReference};
//! async fn sample(client: &Client) -> anyhow::Result<()> {
//!     let config = LoadConfig::new(
//!         ["gs://my-bucket/data/*.json"],
//!         TableReference::new("my-project", "my_dataset", "my_table"),
//!     )
//!     .with_source_format(SourceFormat::NewlineDelimitedJson)
//!     .with_autodetect(true)
//!     .with_labels([("team", "analytics")]);
//!     let mut job = client.run("my-project", config).await?;
//!     let job = job.wait().await?;
//!     println!("loaded {:?}", job.statistics);
//!     Ok(())
//! }
//! ```

use crate::Result;
use crate::iterator::RowIterator;
use crate::model::{
    Compression, CreateDisposition, DatasetReference, ErrorProto, Job, JobConfiguration,
    JobConfigurationExtract, JobConfigurationLoad, JobConfigurationQuery,
    JobConfigurationTableCopy, JobReference, JobStatus, Priority, QueryParameter, SourceFormat,
    TableReference, TableSchema, WriteDisposition,
};
use crate::query::QueryError;
use crate::transport::BigQuery;
use gax::error::Error;
use gax::options::RequestOptions;
use gax::response::Response;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_JOB_ID_PREFIX: &str = "job_";

/// The errors reported by completed jobs.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum JobError {
    /// The job completed with an error.
    #[error("job {job_id} failed: {error}")]
    Failed {
        job_id: String,
        /// The error that caused the job to fail.
        error: ErrorProto,
        /// All the errors reported by the job, some may not be fatal.
        errors: Vec<ErrorProto>,
    },
    /// Only query jobs have results to read.
    #[error("job {0} is not a query job")]
    NotQuery(String),
}

/// Settings shared by all job types.
#[derive(Clone, Debug, Default)]
pub struct JobSettings {
    job_id: Option<String>,
    job_id_prefix: Option<String>,
    location: Option<String>,
    labels: HashMap<String, String>,
    dry_run: bool,
    job_timeout: Option<Duration>,
}

/// Setters for the [JobSettings] of each job configuration.
pub trait JobConfig: internal::JobConfig + Sized {
    /// Use this job id. By default the client generates a random id.
    fn with_job_id<V: Into<String>>(self, v: V) -> Self;

    /// Prefix the generated job id with this value, instead of `job_`.
    fn with_job_id_prefix<V: Into<String>>(self, v: V) -> Self;

    /// Run the job in this location.
    fn with_location<V: Into<String>>(self, v: V) -> Self;

    /// Attach these labels to the job.
    fn with_labels<T, K, V>(self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;

    /// Validate the job without running it.
    fn with_dry_run(self, v: bool) -> Self;

    /// The service cancels the job if it runs longer than this.
    fn with_job_timeout<V: Into<Duration>>(self, v: V) -> Self;
}

impl<T: internal::JobConfig> JobConfig for T {
    fn with_job_id<V: Into<String>>(mut self, v: V) -> Self {
        self.settings().job_id = Some(v.into());
        self
    }

    fn with_job_id_prefix<V: Into<String>>(mut self, v: V) -> Self {
        self.settings().job_id_prefix = Some(v.into());
        self
    }

    fn with_location<V: Into<String>>(mut self, v: V) -> Self {
        self.settings().location = Some(v.into());
        self
    }

    fn with_labels<I, K, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.settings().labels = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    fn with_dry_run(mut self, v: bool) -> Self {
        self.settings().dry_run = v;
        self
    }

    fn with_job_timeout<V: Into<Duration>>(mut self, v: V) -> Self {
        self.settings().job_timeout = Some(v.into());
        self
    }
}

#[doc(hidden)]
pub mod internal {
    //! Implementation details of the job configurations.

    pub trait JobConfig {
        fn settings(&mut self) -> &mut super::JobSettings;
        fn into_parts(self) -> (super::JobConfiguration, super::JobSettings);
    }
}

/// Configures a query job.
///
/// Use [Client::query][crate::client::Client::query] for queries that do
/// not need the job settings, it often returns the first page of results
/// without creating a job.
#[derive(Clone, Debug)]
pub struct QueryConfig {
    query: JobConfigurationQuery,
    settings: JobSettings,
}

impl QueryConfig {
    /// A query job using standard SQL.
    pub fn new<T: Into<String>>(sql: T) -> Self {
        Self {
            query: JobConfigurationQuery {
                query: sql.into(),
                use_legacy_sql: Some(false),
                ..Default::default()
            },
            settings: JobSettings::default(),
        }
    }

    /// Write the results to this table.
    pub fn with_destination_table(mut self, v: TableReference) -> Self {
        self.query.destination_table = Some(v);
        self
    }

    pub fn with_write_disposition(mut self, v: WriteDisposition) -> Self {
        self.query.write_disposition = Some(v);
        self
    }

    pub fn with_create_disposition(mut self, v: CreateDisposition) -> Self {
        self.query.create_disposition = Some(v);
        self
    }

    pub fn with_priority(mut self, v: Priority) -> Self {
        self.query.priority = Some(v);
        self
    }

    /// Resolve unqualified table names in this dataset.
    pub fn with_default_dataset(mut self, v: DatasetReference) -> Self {
        self.query.default_dataset = Some(v);
        self
    }

    /// Set the query parameters.
    ///
    /// The parameter mode is `NAMED` if any parameter has a name, and
    /// `POSITIONAL` otherwise.
    pub fn with_parameters<I: IntoIterator<Item = QueryParameter>>(mut self, v: I) -> Self {
        let parameters: Vec<_> = v.into_iter().collect();
        let mode = match parameters.iter().any(|p| p.name.is_some()) {
            true => "NAMED",
            false => "POSITIONAL",
        };
        self.query.parameter_mode = Some(mode.to_string());
        self.query.query_parameters = parameters;
        self
    }

    pub fn with_use_legacy_sql(mut self, v: bool) -> Self {
        self.query.use_legacy_sql = Some(v);
        self
    }

    pub fn with_use_query_cache(mut self, v: bool) -> Self {
        self.query.use_query_cache = Some(v);
        self
    }

    /// Fail the query if it would bill more than this many bytes.
    pub fn with_maximum_bytes_billed(mut self, v: i64) -> Self {
        self.query.maximum_bytes_billed = Some(v);
        self
    }
}

impl internal::JobConfig for QueryConfig {
    fn settings(&mut self) -> &mut JobSettings {
        &mut self.settings
    }

    fn into_parts(self) -> (JobConfiguration, JobSettings) {
        let configuration = JobConfiguration {
            query: Some(self.query),
            ..Default::default()
        };
        (configuration, self.settings)
    }
}

/// Configures a load job, reading files from Cloud Storage into a table.
#[derive(Clone, Debug)]
pub struct LoadConfig {
    load: JobConfigurationLoad,
    settings: JobSettings,
}

impl LoadConfig {
    /// Load the files in `uris` into `destination`.
    ///
    /// The URIs use the `gs://bucket/object` format, and may contain a single
    /// `*` wildcard.
    pub fn new<I, V>(uris: I, destination: TableReference) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            load: JobConfigurationLoad {
                source_uris: uris.into_iter().map(Into::into).collect(),
                destination_table: Some(destination),
                ..Default::default()
            },
            settings: JobSettings::default(),
        }
    }

    pub fn with_schema(mut self, v: TableSchema) -> Self {
        self.load.schema = Some(v);
        self
    }

    pub fn with_source_format(mut self, v: SourceFormat) -> Self {
        self.load.source_format = Some(v);
        self
    }

    /// Infer the schema and the CSV options from the data.
    pub fn with_autodetect(mut self, v: bool) -> Self {
        self.load.autodetect = Some(v);
        self
    }

    pub fn with_skip_leading_rows(mut self, v: i64) -> Self {
        self.load.skip_leading_rows = Some(v);
        self
    }

    pub fn with_field_delimiter<T: Into<String>>(mut self, v: T) -> Self {
        self.load.field_delimiter = Some(v.into());
        self
    }

    pub fn with_max_bad_records(mut self, v: i32) -> Self {
        self.load.max_bad_records = Some(v);
        self
    }

    pub fn with_allow_jagged_rows(mut self, v: bool) -> Self {
        self.load.allow_jagged_rows = Some(v);
        self
    }

    pub fn with_ignore_unknown_values(mut self, v: bool) -> Self {
        self.load.ignore_unknown_values = Some(v);
        self
    }

    pub fn with_write_disposition(mut self, v: WriteDisposition) -> Self {
        self.load.write_disposition = Some(v);
        self
    }

    pub fn with_create_disposition(mut self, v: CreateDisposition) -> Self {
        self.load.create_disposition = Some(v);
        self
    }
}

impl internal::JobConfig for LoadConfig {
    fn settings(&mut self) -> &mut JobSettings {
        &mut self.settings
    }

    fn into_parts(self) -> (JobConfiguration, JobSettings) {
        let configuration = JobConfiguration {
            load: Some(self.load),
            ..Default::default()
        };
        (configuration, self.settings)
    }
}

/// Configures an extract job, exporting a table to Cloud Storage.
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    extract: JobConfigurationExtract,
    settings: JobSettings,
}

impl ExtractConfig {
    pub fn new<I, V>(source: TableReference, uris: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            extract: JobConfigurationExtract {
                source_table: Some(source),
                destination_uris: uris.into_iter().map(Into::into).collect(),
                ..Default::default()
            },
            settings: JobSettings::default(),
        }
    }

    pub fn with_destination_format(mut self, v: SourceFormat) -> Self {
        self.extract.destination_format = Some(v);
        self
    }

    pub fn with_compression(mut self, v: Compression) -> Self {
        self.extract.compression = Some(v);
        self
    }

    pub fn with_field_delimiter<T: Into<String>>(mut self, v: T) -> Self {
        self.extract.field_delimiter = Some(v.into());
        self
    }

    pub fn with_print_header(mut self, v: bool) -> Self {
        self.extract.print_header = Some(v);
        self
    }
}

impl internal::JobConfig for ExtractConfig {
    fn settings(&mut self) -> &mut JobSettings {
        &mut self.settings
    }

    fn into_parts(self) -> (JobConfiguration, JobSettings) {
        let configuration = JobConfiguration {
            extract: Some(self.extract),
            ..Default::default()
        };
        (configuration, self.settings)
    }
}

/// Configures a copy job, copying one or more tables into a table.
#[derive(Clone, Debug)]
pub struct CopyConfig {
    copy: JobConfigurationTableCopy,
    settings: JobSettings,
}

impl CopyConfig {
    pub fn new<I: IntoIterator<Item = TableReference>>(sources: I, destination: TableReference) -> Self {
        Self {
            copy: JobConfigurationTableCopy {
                source_tables: sources.into_iter().collect(),
                destination_table: Some(destination),
                ..Default::default()
            },
            settings: JobSettings::default(),
        }
    }

    pub fn with_write_disposition(mut self, v: WriteDisposition) -> Self {
        self.copy.write_disposition = Some(v);
        self
    }

    pub fn with_create_disposition(mut self, v: CreateDisposition) -> Self {
        self.copy.create_disposition = Some(v);
        self
    }
}

impl internal::JobConfig for CopyConfig {
    fn settings(&mut self) -> &mut JobSettings {
        &mut self.settings
    }

    fn into_parts(self) -> (JobConfiguration, JobSettings) {
        let configuration = JobConfiguration {
            copy: Some(self.copy),
            ..Default::default()
        };
        (configuration, self.settings)
    }
}

fn new_job_id(prefix: Option<&str>) -> String {
    format!(
        "{}{}",
        prefix.unwrap_or(DEFAULT_JOB_ID_PREFIX),
        uuid::Uuid::new_v4().simple()
    )
}

/// Inserts the job described by `config`.
pub(crate) async fn run<C: JobConfig>(
    inner: Arc<BigQuery>,
    project_id: String,
    config: C,
    options: RequestOptions,
) -> Result<JobHandle> {
    let (mut configuration, settings) = config.into_parts();
    let (job_id, generated) = match settings.job_id {
        Some(id) => (id, false),
        None => (new_job_id(settings.job_id_prefix.as_deref()), true),
    };
    configuration.labels = settings.labels;
    configuration.dry_run = settings.dry_run.then_some(true);
    configuration.job_timeout_ms = settings.job_timeout.map(|d| d.as_millis() as i64);
    let reference = JobReference {
        project_id: project_id.clone(),
        job_id,
        location: settings.location,
    };
    let job = Job {
        job_reference: Some(reference.clone()),
        configuration: Some(configuration),
        ..Default::default()
    };
    tracing::debug!(job_id = %reference.job_id, "inserting job");
    let job = match inner.insert_job(&project_id, job, options.clone()).await {
        Ok(r) => r.into_body(),
        // A retried insert where the first attempt created the job.
        Err(e) if generated && e.http_status_code() == Some(409) => inner
            .get_job(&project_id, &reference.job_id, &reference.location, options.clone())
            .await
            .map(Response::into_body)?,
        Err(e) => return Err(e),
    };
    Ok(JobHandle::new(inner, reference, job, options))
}

/// A handle to a job, returned by [Client::run][crate::client::Client::run].
#[derive(Clone, Debug)]
pub struct JobHandle {
    inner: Arc<BigQuery>,
    reference: JobReference,
    last: Job,
    options: RequestOptions,
}

impl JobHandle {
    pub(crate) fn new(
        inner: Arc<BigQuery>,
        reference: JobReference,
        job: Job,
        options: RequestOptions,
    ) -> Self {
        // The service fills the location when the request did not set it.
        let reference = match job.job_reference.as_ref() {
            Some(r) if !r.job_id.is_empty() => r.clone(),
            _ => reference,
        };
        Self {
            inner,
            reference,
            last: job,
            options,
        }
    }

    /// The job id.
    pub fn id(&self) -> &str {
        &self.reference.job_id
    }

    pub fn reference(&self) -> &JobReference {
        &self.reference
    }

    /// The job as of the last request.
    pub fn job(&self) -> &Job {
        &self.last
    }

    /// The job status as of the last request.
    pub fn last_status(&self) -> Option<&JobStatus> {
        self.last.status.as_ref()
    }

    /// Fetches the job, and returns its current status.
    pub async fn status(&mut self) -> Result<JobStatus> {
        self.last = self.fetch().await?;
        Ok(self.last.status.clone().unwrap_or_default())
    }

    /// Waits until the job is done.
    ///
    /// Polls the job using the polling policies from the client or from
    /// [with_polling_error_policy()] and [with_polling_backoff_policy()].
    /// Returns an error wrapping [JobError::Failed] if the job completes
    /// with an error.
    ///
    /// [with_polling_error_policy()]: gax::options::RequestOptionsBuilder::with_polling_error_policy
    /// [with_polling_backoff_policy()]: gax::options::RequestOptionsBuilder::with_polling_backoff_policy
    #[tracing::instrument(skip(self), fields(job_id = %self.reference.job_id))]
    pub async fn wait(&mut self) -> Result<Job> {
        if !is_done(&self.last) {
            let error_policy = self.inner.polling_error_policy(&self.options);
            let backoff_policy = self.inner.polling_backoff_policy(&self.options);
            let query = async || self.fetch().await;
            let sleep = async |d| tokio::time::sleep(d).await;
            let job = gax::polling::poll_until(
                &self.reference.job_id,
                query,
                is_done,
                sleep,
                error_policy,
                backoff_policy,
            )
            .await?;
            self.last = job;
        }
        let status = self.last.status.clone().unwrap_or_default();
        if let Some(error) = status.error_result {
            tracing::debug!(error = %error, "job failed");
            return Err(Error::deser(JobError::Failed {
                job_id: self.reference.job_id.clone(),
                error,
                errors: status.errors,
            }));
        }
        Ok(self.last.clone())
    }

    /// Requests the cancellation of the job.
    ///
    /// The job may still complete, use [wait][JobHandle::wait] to find out.
    pub async fn cancel(&self) -> Result<()> {
        self.inner
            .cancel_job(
                &self.reference.project_id,
                &self.reference.job_id,
                &self.reference.location,
                self.options.clone(),
            )
            .await?;
        Ok(())
    }

    /// Reads the results of a completed query job.
    pub async fn read(&self) -> Result<RowIterator> {
        let is_query = self
            .last
            .configuration
            .as_ref()
            .is_some_and(|c| c.query.is_some());
        if !is_query {
            return Err(Error::ser(JobError::NotQuery(self.reference.job_id.clone())));
        }
        if !is_done(&self.last) {
            return Err(Error::ser(QueryError::NotComplete));
        }
        RowIterator::query_results(
            self.inner.clone(),
            self.reference.clone(),
            None,
            self.options.clone(),
        )
        .await
    }

    async fn fetch(&self) -> Result<Job> {
        self.inner
            .get_job(
                &self.reference.project_id,
                &self.reference.job_id,
                &self.reference.location,
                self.options.clone(),
            )
            .await
            .map(Response::into_body)
    }
}

#[doc(hidden)]
impl gax::options::internal::RequestBuilder for JobHandle {
    fn request_options(&mut self) -> &mut RequestOptions {
        &mut self.options
    }
}

fn is_done(job: &Job) -> bool {
    job.status.as_ref().is_some_and(JobStatus::is_done)
}
