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

use crate::Result;
use crate::iterator::RowIterator;
use crate::model::{
    DataFormatOptions, DatasetReference, GetQueryResultsResponse, JobReference, QueryParameter,
    QueryRequest, QueryResponse, TableSchema,
};
use crate::schema::Schema;
use crate::transport::{BigQuery, QueryResultsParams};
use gax::options::RequestOptions;
use gax::response::Response;
use std::sync::Arc;
use std::time::Duration;

/// Represents errors that can occur when running queries.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum QueryError {
    /// Only complete Query Jobs can be read.
    #[error("Query is not complete: Only complete Query Jobs can be read.")]
    NotComplete,
    /// The service did not return a job to wait for.
    #[error("the query response is missing the job reference")]
    MissingJobReference,
}

/// The request builder for [Client::query][crate::client::Client::query] calls.
///
/// # Example
/// ```
/// # use cloudkit_bigquery::client::Client;
/// use cloudkit_bigquery::model::QueryParameter;
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let mut query = client
///         .query("my-project", "SELECT word FROM `bigquery-public-data.samples.shakespeare` WHERE corpus = @corpus")
///         .with_parameters([QueryParameter::named("corpus", "STRING", "hamlet")])
///         .send()
///         .await?;
///     query.wait().await?;
///     let mut rows = query.read().await?;
///     while let Some(row) = rows.next().await {
///         println!("{:?}", row?.get::<String>("word")?);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    inner: Arc<BigQuery>,
    project_id: String,
    request: QueryRequest,
    options: RequestOptions,
}

impl QueryBuilder {
    pub(crate) fn new(inner: Arc<BigQuery>, project_id: String, sql: String) -> Self {
        Self {
            inner,
            project_id,
            request: QueryRequest {
                query: sql,
                use_legacy_sql: Some(false),
                format_options: Some(DataFormatOptions {
                    use_int64_timestamp: Some(true),
                }),
                ..Default::default()
            },
            options: RequestOptions::default(),
        }
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
        self.request.parameter_mode = Some(mode.to_string());
        self.request.query_parameters = parameters;
        self
    }

    /// Validate the query and estimate its cost, without running it.
    pub fn with_dry_run(mut self, v: bool) -> Self {
        self.request.dry_run = Some(v);
        self
    }

    /// Run the query in this location.
    pub fn with_location<T: Into<String>>(mut self, v: T) -> Self {
        self.request.location = Some(v.into());
        self
    }

    /// The maximum number of rows in each page of results.
    pub fn with_max_results(mut self, v: u32) -> Self {
        self.request.max_results = Some(v);
        self
    }

    /// Resolve unqualified table names in this dataset.
    pub fn with_default_dataset(mut self, v: DatasetReference) -> Self {
        self.request.default_dataset = Some(v);
        self
    }

    pub fn with_use_query_cache(mut self, v: bool) -> Self {
        self.request.use_query_cache = Some(v);
        self
    }

    /// How long the service waits for the query to complete before
    /// returning. The query keeps running after this timeout.
    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.request.timeout_ms = Some(v.as_millis().min(u32::MAX as u128) as u32);
        self
    }

    pub fn with_labels<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.request.labels = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Fail the query if it would bill more than this many bytes.
    pub fn with_maximum_bytes_billed(mut self, v: i64) -> Self {
        self.request.maximum_bytes_billed = Some(v);
        self
    }

    /// Starts the query.
    ///
    /// Each call uses a new request id, the service runs the query at most
    /// once even if the request is retried.
    pub async fn send(self) -> Result<Query> {
        let mut request = self.request;
        request.request_id = Some(uuid::Uuid::new_v4().to_string());
        let dry_run = request.dry_run == Some(true);
        let location = request.location.clone();
        let max_results = request.max_results;
        let response = self
            .inner
            .query(&self.project_id, request, self.options.clone())
            .await?
            .into_body();
        let mut query = Query::new(self.inner, self.project_id, self.options, response);
        if query.location.is_none() {
            query.location = location;
        }
        query.max_results = max_results;
        // Dry runs report the schema and statistics, there is no job to wait for.
        query.completed |= dry_run;
        Ok(query)
    }
}

#[doc(hidden)]
impl gax::options::internal::RequestBuilder for QueryBuilder {
    fn request_options(&mut self) -> &mut RequestOptions {
        &mut self.options
    }
}

/// A query started with [Client::query][crate::client::Client::query].
///
/// The service often completes short queries before returning, in that case
/// the first page of results is cached in this object.
#[derive(Clone, Debug)]
pub struct Query {
    inner: Arc<BigQuery>,
    options: RequestOptions,
    project_id: String,
    job_id: String,
    location: Option<String>,
    query_id: Option<String>,
    max_results: Option<u32>,
    schema: Option<Schema>,
    total_rows: u64,
    completed: bool,
    // The first page, if the results were returned with the job.
    first_page: Option<GetQueryResultsResponse>,
    num_dml_affected_rows: i64,
    total_bytes_processed: i64,
    cache_hit: bool,
}

impl Query {
    pub(crate) fn new(
        inner: Arc<BigQuery>,
        project_id: String,
        options: RequestOptions,
        response: QueryResponse,
    ) -> Self {
        let mut query = Self {
            inner,
            options,
            project_id,
            job_id: String::default(),
            location: None,
            query_id: response.query_id.clone().filter(|q| !q.is_empty()),
            max_results: None,
            schema: None,
            total_rows: 0,
            completed: false,
            first_page: None,
            num_dml_affected_rows: 0,
            total_bytes_processed: 0,
            cache_hit: false,
        };
        query.consume_query_response(GetQueryResultsResponse::from(response), true);
        query
    }

    /// The job running this query, if any.
    pub fn job_reference(&self) -> Option<JobReference> {
        if self.job_id.is_empty() {
            return None;
        }
        Some(JobReference {
            project_id: self.project_id.clone(),
            job_id: self.job_id.clone(),
            location: self.location.clone(),
        })
    }

    /// The query id, for queries that completed without creating a job.
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    pub fn schema(&self) -> Option<TableSchema> {
        self.schema.as_ref().map(Schema::to_table_schema)
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// The number of rows changed by a DML statement.
    pub fn num_dml_affected_rows(&self) -> i64 {
        self.num_dml_affected_rows
    }

    pub fn total_bytes_processed(&self) -> i64 {
        self.total_bytes_processed
    }

    /// True if the results came from the query cache.
    pub fn cache_hit(&self) -> bool {
        self.cache_hit
    }

    /// Waits for the query to complete.
    ///
    /// Polls `getQueryResults` using the polling policies from the client or
    /// the request options. A failed query is reported as an error.
    #[tracing::instrument(skip(self), fields(job_id = %self.job_id))]
    pub async fn wait(&mut self) -> Result<()> {
        if self.completed {
            return Ok(());
        }
        if self.job_id.is_empty() {
            return Err(crate::Error::deser(QueryError::MissingJobReference));
        }
        let params = QueryResultsParams {
            location: self.location.clone(),
            max_results: Some(0),
            ..Default::default()
        };
        let error_policy = self.inner.polling_error_policy(&self.options);
        let backoff_policy = self.inner.polling_backoff_policy(&self.options);
        let inner = self.inner.clone();
        let options = self.options.clone();
        let (project_id, job_id) = (self.project_id.clone(), self.job_id.clone());
        let query = async || {
            inner
                .get_query_results(&project_id, &job_id, &params, options.clone())
                .await
                .map(Response::into_body)
        };
        let done = |r: &GetQueryResultsResponse| r.job_complete == Some(true);
        let sleep = async |d| tokio::time::sleep(d).await;
        let response =
            gax::polling::poll_until(&job_id, query, done, sleep, error_policy, backoff_policy)
                .await?;
        self.consume_query_response(response, false);
        Ok(())
    }

    /// Returns an iterator over the query results.
    ///
    /// Fails with [QueryError::NotComplete] if the query is still running,
    /// use [wait][Query::wait] first.
    pub async fn read(self) -> Result<RowIterator> {
        if !self.completed {
            return Err(crate::Error::ser(QueryError::NotComplete));
        }
        let reference = JobReference {
            project_id: self.project_id,
            job_id: self.job_id,
            location: self.location,
        };
        match self.first_page {
            Some(page) => RowIterator::from_query_page(
                self.inner,
                reference,
                self.max_results,
                self.options,
                page,
            ),
            None => {
                RowIterator::query_results(self.inner, reference, self.max_results, self.options)
                    .await
            }
        }
    }

    fn consume_query_response(&mut self, res: GetQueryResultsResponse, with_rows: bool) {
        if let Some(job_ref) = &res.job_reference {
            self.job_id = job_ref.job_id.clone();
            if job_ref.location.is_some() {
                self.location = job_ref.location.clone();
            }
        }
        if let Some(job_complete) = res.job_complete {
            self.completed = job_complete;
        }
        if let Some(schema) = &res.schema {
            self.schema = Some(Schema::new(schema.clone()));
        }
        if let Some(total_rows) = res.total_rows {
            self.total_rows = total_rows;
        }
        if let Some(n) = res.num_dml_affected_rows {
            self.num_dml_affected_rows = n;
        }
        if let Some(n) = res.total_bytes_processed {
            self.total_bytes_processed = n;
        }
        if let Some(hit) = res.cache_hit {
            self.cache_hit = hit;
        }
        // rows are only present if the query is complete and has a schema
        self.first_page = (with_rows && self.completed && res.schema.is_some()).then_some(res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gax::client_builder::ClientConfig;
    use gax::credentials::AnonymousCredentials;
    use serde_json::json;

    impl Query {
        fn cached_rows(&self) -> &[crate::model::TableRow] {
            self.first_page
                .as_ref()
                .map(|p| p.rows.as_slice())
                .unwrap_or_default()
        }
    }

    async fn test_inner() -> anyhow::Result<Arc<BigQuery>> {
        let config = ClientConfig {
            cred: Some(AnonymousCredentials::new().into()),
            ..ClientConfig::default()
        };
        Ok(Arc::new(BigQuery::new(config).await?))
    }

    fn response(value: serde_json::Value) -> anyhow::Result<QueryResponse> {
        Ok(serde_json::from_value(value)?)
    }

    #[tokio::test]
    async fn complete_with_rows() -> anyhow::Result<()> {
        let response = response(json!({
            "jobReference": {"projectId": "p", "jobId": "j", "location": "US"},
            "jobComplete": true,
            "schema": {"fields": [{"name": "x", "type": "INTEGER"}]},
            "rows": [{"f": [{"v": "1"}]}, {"f": [{"v": "2"}]}],
            "totalRows": "2",
            "totalBytesProcessed": "100",
            "cacheHit": true,
        }))?;
        let query = Query::new(test_inner().await?, "p".into(), RequestOptions::default(), response);
        assert!(query.completed());
        assert_eq!(query.total_rows(), 2);
        assert_eq!(query.total_bytes_processed(), 100);
        assert!(query.cache_hit());
        assert_eq!(query.cached_rows().len(), 2);
        let reference = query.job_reference().expect("query has a job");
        assert_eq!(reference.job_id, "j");
        assert_eq!(reference.location.as_deref(), Some("US"));
        assert_eq!(query.schema().map(|s| s.fields.len()), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn incomplete() -> anyhow::Result<()> {
        let response = response(json!({
            "jobReference": {"projectId": "p", "jobId": "j"},
            "jobComplete": false,
            "queryId": "q-123",
        }))?;
        let query = Query::new(test_inner().await?, "p".into(), RequestOptions::default(), response);
        assert!(!query.completed());
        assert_eq!(query.query_id(), Some("q-123"));
        assert!(query.cached_rows().is_empty());
        let err = query.read().await.unwrap_err();
        assert!(err.is_serialization(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn wait_without_job() -> anyhow::Result<()> {
        let response = response(json!({"jobComplete": false}))?;
        let mut query =
            Query::new(test_inner().await?, "p".into(), RequestOptions::default(), response);
        assert!(query.job_reference().is_none());
        let err = query.wait().await.unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        Ok(())
    }

    #[test]
    fn builder_defaults() -> anyhow::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let inner = rt.block_on(test_inner())?;
        let builder = QueryBuilder::new(inner, "p".into(), "SELECT 1".into())
            .with_parameters([QueryParameter::positional("INT64", "1")])
            .with_location("EU")
            .with_max_results(10)
            .with_timeout(Duration::from_secs(5))
            .with_dry_run(true);
        let got = serde_json::to_value(&builder.request)?;
        assert_eq!(
            got,
            json!({
                "query": "SELECT 1",
                "maxResults": 10,
                "timeoutMs": 5000,
                "dryRun": true,
                "useLegacySql": false,
                "parameterMode": "POSITIONAL",
                "queryParameters": [{
                    "parameterType": {"type": "INT64"},
                    "parameterValue": {"value": "1"},
                }],
                "location": "EU",
                "formatOptions": {"useInt64Timestamp": true},
            })
        );
        Ok(())
    }
}
