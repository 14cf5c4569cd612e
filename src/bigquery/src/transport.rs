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

//! The REST bindings for the BigQuery v2 API.

use crate::Result;
use crate::model;
use gax::client_builder::ClientConfig;
use gax::http::{NoBody, ReqwestClient};
use gax::options::RequestOptions;
use gax::polling_backoff_policy::PollingBackoffPolicy;
use gax::polling_error_policy::PollingErrorPolicy;
use gax::response::Response;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use std::sync::Arc;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com";

// Table ids may contain partition decorators, such as `my_table$20250101`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn enc(s: &str) -> percent_encoding::PercentEncode<'_> {
    utf8_percent_encode(s, SEGMENT)
}

fn project_path(project_id: &str) -> String {
    format!("/bigquery/v2/projects/{}", enc(project_id))
}

fn dataset_path(project_id: &str, dataset_id: &str) -> String {
    format!("{}/datasets/{}", project_path(project_id), enc(dataset_id))
}

fn table_path(project_id: &str, dataset_id: &str, table_id: &str) -> String {
    format!(
        "{}/tables/{}",
        dataset_path(project_id, dataset_id),
        enc(table_id)
    )
}

fn job_path(project_id: &str, job_id: &str) -> String {
    format!("{}/jobs/{}", project_path(project_id), enc(job_id))
}

fn with_location(builder: reqwest::RequestBuilder, location: &Option<String>) -> reqwest::RequestBuilder {
    match location {
        Some(l) if !l.is_empty() => builder.query(&[("location", l)]),
        _ => builder,
    }
}

fn with_if_match(builder: reqwest::RequestBuilder, etag: &Option<String>) -> reqwest::RequestBuilder {
    match etag {
        Some(e) if !e.is_empty() => builder.header(reqwest::header::IF_MATCH, e),
        _ => builder,
    }
}

fn with_paging(
    builder: reqwest::RequestBuilder,
    max_results: Option<u32>,
    page_token: &str,
) -> reqwest::RequestBuilder {
    let builder = match max_results {
        Some(m) => builder.query(&[("maxResults", m)]),
        None => builder,
    };
    if page_token.is_empty() {
        return builder;
    }
    builder.query(&[("pageToken", page_token)])
}

/// Parameters for `jobs.list`.
#[derive(Clone, Debug, Default)]
pub(crate) struct ListJobsParams {
    pub all_users: bool,
    pub state_filter: Vec<String>,
    pub max_results: Option<u32>,
    pub min_creation_time: Option<i64>,
    pub max_creation_time: Option<i64>,
    pub parent_job_id: Option<String>,
}

/// Parameters for `jobs.getQueryResults`.
#[derive(Clone, Debug, Default)]
pub(crate) struct QueryResultsParams {
    pub location: Option<String>,
    pub max_results: Option<u32>,
    pub page_token: String,
    pub timeout_ms: Option<u32>,
}

/// Parameters for `tabledata.list`.
#[derive(Clone, Debug, Default)]
pub(crate) struct TableDataParams {
    pub max_results: Option<u32>,
    pub page_token: String,
    pub start_index: Option<u64>,
}

/// Implements the BigQuery v2 REST API over [ReqwestClient].
#[derive(Clone, Debug)]
pub(crate) struct BigQuery {
    inner: ReqwestClient,
}

impl BigQuery {
    pub(crate) async fn new(config: ClientConfig) -> gax::client_builder::Result<Self> {
        let inner = ReqwestClient::new(config, DEFAULT_ENDPOINT).await?;
        Ok(Self { inner })
    }

    pub(crate) fn polling_error_policy(
        &self,
        options: &RequestOptions,
    ) -> Arc<dyn PollingErrorPolicy> {
        self.inner.get_polling_error_policy(options)
    }

    pub(crate) fn polling_backoff_policy(
        &self,
        options: &RequestOptions,
    ) -> Arc<dyn PollingBackoffPolicy> {
        self.inner.get_polling_backoff_policy(options)
    }

    pub(crate) async fn insert_dataset(
        &self,
        project_id: &str,
        dataset: model::Dataset,
        options: RequestOptions,
    ) -> Result<Response<model::Dataset>> {
        let options = options.set_default_idempotency(false);
        let path = format!("{}/datasets", project_path(project_id));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(dataset), options).await
    }

    pub(crate) async fn get_dataset(
        &self,
        project_id: &str,
        dataset_id: &str,
        options: RequestOptions,
    ) -> Result<Response<model::Dataset>> {
        let options = options.set_default_idempotency(true);
        let builder = self
            .inner
            .builder(Method::GET, dataset_path(project_id, dataset_id));
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn patch_dataset(
        &self,
        project_id: &str,
        dataset_id: &str,
        dataset: model::Dataset,
        options: RequestOptions,
    ) -> Result<Response<model::Dataset>> {
        // With an etag the update is conditional, and safe to retry.
        let options = options.set_default_idempotency(dataset.etag.is_some());
        let builder = self
            .inner
            .builder(Method::PATCH, dataset_path(project_id, dataset_id));
        let builder = with_if_match(builder, &dataset.etag);
        self.inner.execute(builder, Some(dataset), options).await
    }

    pub(crate) async fn delete_dataset(
        &self,
        project_id: &str,
        dataset_id: &str,
        delete_contents: bool,
        options: RequestOptions,
    ) -> Result<Response<()>> {
        let options = options.set_default_idempotency(true);
        let builder = self
            .inner
            .builder(Method::DELETE, dataset_path(project_id, dataset_id));
        let builder = match delete_contents {
            true => builder.query(&[("deleteContents", "true")]),
            false => builder,
        };
        self.inner
            .execute::<NoBody, serde_json::Value>(builder, None, options)
            .await
            .map(|r| r.map(|_| ()))
    }

    pub(crate) async fn list_datasets(
        &self,
        project_id: &str,
        all: bool,
        filter: &Option<String>,
        max_results: Option<u32>,
        page_token: &str,
        options: RequestOptions,
    ) -> Result<Response<model::DatasetList>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/datasets", project_path(project_id));
        let builder = self.inner.builder(Method::GET, path);
        let builder = match all {
            true => builder.query(&[("all", "true")]),
            false => builder,
        };
        let builder = match filter {
            Some(f) => builder.query(&[("filter", f)]),
            None => builder,
        };
        let builder = with_paging(builder, max_results, page_token);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn insert_table(
        &self,
        project_id: &str,
        dataset_id: &str,
        table: model::Table,
        options: RequestOptions,
    ) -> Result<Response<model::Table>> {
        let options = options.set_default_idempotency(false);
        let path = format!("{}/tables", dataset_path(project_id, dataset_id));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(table), options).await
    }

    pub(crate) async fn get_table(
        &self,
        reference: &model::TableReference,
        options: RequestOptions,
    ) -> Result<Response<model::Table>> {
        let options = options.set_default_idempotency(true);
        let path = table_path(
            &reference.project_id,
            &reference.dataset_id,
            &reference.table_id,
        );
        let builder = self.inner.builder(Method::GET, path);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn patch_table(
        &self,
        reference: &model::TableReference,
        table: model::Table,
        options: RequestOptions,
    ) -> Result<Response<model::Table>> {
        let options = options.set_default_idempotency(table.etag.is_some());
        let path = table_path(
            &reference.project_id,
            &reference.dataset_id,
            &reference.table_id,
        );
        let builder = with_if_match(self.inner.builder(Method::PATCH, path), &table.etag);
        self.inner.execute(builder, Some(table), options).await
    }

    pub(crate) async fn delete_table(
        &self,
        reference: &model::TableReference,
        options: RequestOptions,
    ) -> Result<Response<()>> {
        let options = options.set_default_idempotency(true);
        let path = table_path(
            &reference.project_id,
            &reference.dataset_id,
            &reference.table_id,
        );
        let builder = self.inner.builder(Method::DELETE, path);
        self.inner
            .execute::<NoBody, serde_json::Value>(builder, None, options)
            .await
            .map(|r| r.map(|_| ()))
    }

    pub(crate) async fn list_tables(
        &self,
        project_id: &str,
        dataset_id: &str,
        max_results: Option<u32>,
        page_token: &str,
        options: RequestOptions,
    ) -> Result<Response<model::TableList>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/tables", dataset_path(project_id, dataset_id));
        let builder = with_paging(self.inner.builder(Method::GET, path), max_results, page_token);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn insert_job(
        &self,
        project_id: &str,
        job: model::Job,
        options: RequestOptions,
    ) -> Result<Response<model::Job>> {
        // The service rejects a second job with the same id, so inserts with
        // an id are safe to retry.
        let has_id = job
            .job_reference
            .as_ref()
            .is_some_and(|r| !r.job_id.is_empty());
        let options = options.set_default_idempotency(has_id);
        let path = format!("{}/jobs", project_path(project_id));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(job), options).await
    }

    pub(crate) async fn get_job(
        &self,
        project_id: &str,
        job_id: &str,
        location: &Option<String>,
        options: RequestOptions,
    ) -> Result<Response<model::Job>> {
        let options = options.set_default_idempotency(true);
        let builder = self.inner.builder(Method::GET, job_path(project_id, job_id));
        let builder = with_location(builder, location);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn cancel_job(
        &self,
        project_id: &str,
        job_id: &str,
        location: &Option<String>,
        options: RequestOptions,
    ) -> Result<Response<model::JobCancelResponse>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/cancel", job_path(project_id, job_id));
        let builder = with_location(self.inner.builder(Method::POST, path), location);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn delete_job(
        &self,
        project_id: &str,
        job_id: &str,
        location: &Option<String>,
        options: RequestOptions,
    ) -> Result<Response<()>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/delete", job_path(project_id, job_id));
        let builder = with_location(self.inner.builder(Method::DELETE, path), location);
        self.inner
            .execute::<NoBody, serde_json::Value>(builder, None, options)
            .await
            .map(|r| r.map(|_| ()))
    }

    pub(crate) async fn list_jobs(
        &self,
        project_id: &str,
        params: &ListJobsParams,
        page_token: &str,
        options: RequestOptions,
    ) -> Result<Response<model::JobList>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/jobs", project_path(project_id));
        let mut builder = self
            .inner
            .builder(Method::GET, path)
            .query(&[("projection", "full")]);
        if params.all_users {
            builder = builder.query(&[("allUsers", "true")]);
        }
        for state in &params.state_filter {
            builder = builder.query(&[("stateFilter", state)]);
        }
        if let Some(t) = params.min_creation_time {
            builder = builder.query(&[("minCreationTime", t)]);
        }
        if let Some(t) = params.max_creation_time {
            builder = builder.query(&[("maxCreationTime", t)]);
        }
        if let Some(p) = &params.parent_job_id {
            builder = builder.query(&[("parentJobId", p)]);
        }
        let builder = with_paging(builder, params.max_results, page_token);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn query(
        &self,
        project_id: &str,
        request: model::QueryRequest,
        options: RequestOptions,
    ) -> Result<Response<model::QueryResponse>> {
        // The request id lets the service discard duplicates.
        let options = options.set_default_idempotency(request.request_id.is_some());
        let path = format!("{}/queries", project_path(project_id));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(request), options).await
    }

    pub(crate) async fn get_query_results(
        &self,
        project_id: &str,
        job_id: &str,
        params: &QueryResultsParams,
        options: RequestOptions,
    ) -> Result<Response<model::GetQueryResultsResponse>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/queries/{}", project_path(project_id), enc(job_id));
        let builder = self
            .inner
            .builder(Method::GET, path)
            .query(&[("formatOptions.useInt64Timestamp", "true")]);
        let builder = with_location(builder, &params.location);
        let builder = match params.timeout_ms {
            Some(t) => builder.query(&[("timeoutMs", t)]),
            None => builder,
        };
        let builder = with_paging(builder, params.max_results, &params.page_token);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn list_table_data(
        &self,
        reference: &model::TableReference,
        params: &TableDataParams,
        options: RequestOptions,
    ) -> Result<Response<model::TableDataList>> {
        let options = options.set_default_idempotency(true);
        let path = format!(
            "{}/data",
            table_path(
                &reference.project_id,
                &reference.dataset_id,
                &reference.table_id
            )
        );
        let builder = self
            .inner
            .builder(Method::GET, path)
            .query(&[("formatOptions.useInt64Timestamp", "true")]);
        let builder = match params.start_index {
            // The service ignores the start index when a page token is set.
            Some(i) if params.page_token.is_empty() => builder.query(&[("startIndex", i)]),
            _ => builder,
        };
        let builder = with_paging(builder, params.max_results, &params.page_token);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn insert_all(
        &self,
        reference: &model::TableReference,
        request: model::TableDataInsertAllRequest,
        options: RequestOptions,
    ) -> Result<Response<model::TableDataInsertAllResponse>> {
        // Every row carries an insert id, the service deduplicates retries.
        let options = options.set_default_idempotency(true);
        let path = format!(
            "{}/insertAll",
            table_path(
                &reference.project_id,
                &reference.dataset_id,
                &reference.table_id
            )
        );
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(request), options).await
    }
}
