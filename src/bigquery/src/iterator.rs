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
use crate::model::{GetQueryResultsResponse, JobReference, TableReference, TableRow, TableSchema};
use crate::row::Row;
use crate::schema::Schema;
use crate::transport::{BigQuery, QueryResultsParams, TableDataParams};
use futures::Stream;
use gax::options::RequestOptions;
use std::collections::VecDeque;
use std::sync::Arc;

/// Represents errors that can occur when reading query results.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum IteratorError {
    /// Only complete Query Jobs with schema can be read.
    #[error("Only complete Query Jobs with schema can be read.")]
    MissingSchema,
}

#[derive(Clone, Debug)]
enum Source {
    Query(JobReference),
    Table {
        reference: TableReference,
        start_index: Option<u64>,
    },
}

/// Iterates over the rows of a query result or a table.
///
/// Rows are fetched one page at a time, as needed.
///
/// # Example
/// ```
/// # use cloudkit_bigquery::iterator::RowIterator;
/// async fn sample(mut rows: RowIterator) -> gax::Result<()> {
///     println!("reading {} rows", rows.total_rows());
///     while let Some(row) = rows.next().await {
///         println!("{:?}", row?.to_value());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RowIterator {
    inner: Arc<BigQuery>,
    source: Source,
    options: RequestOptions,
    max_results: Option<u32>,
    // `None` once the last page is fetched.
    page_token: Option<String>,
    schema: Schema,
    total_rows: u64,
    rows: VecDeque<TableRow>,
}

impl RowIterator {
    /// Creates an iterator seeded with a page of query results.
    pub(crate) fn from_query_page(
        inner: Arc<BigQuery>,
        reference: JobReference,
        max_results: Option<u32>,
        options: RequestOptions,
        page: GetQueryResultsResponse,
    ) -> Result<Self> {
        let Some(schema) = page.schema else {
            return Err(crate::Error::deser(IteratorError::MissingSchema));
        };
        Ok(Self {
            inner,
            source: Source::Query(reference),
            options,
            max_results,
            page_token: page.page_token.filter(|t| !t.is_empty()),
            schema: Schema::new(schema),
            total_rows: page.total_rows.unwrap_or_default(),
            rows: page.rows.into(),
        })
    }

    /// Fetches the first page of results of a completed query job.
    pub(crate) async fn query_results(
        inner: Arc<BigQuery>,
        reference: JobReference,
        max_results: Option<u32>,
        options: RequestOptions,
    ) -> Result<Self> {
        let params = QueryResultsParams {
            location: reference.location.clone(),
            max_results,
            ..Default::default()
        };
        let page = inner
            .get_query_results(
                &reference.project_id,
                &reference.job_id,
                &params,
                options.clone(),
            )
            .await?
            .into_body();
        Self::from_query_page(inner, reference, max_results, options, page)
    }

    /// Reads a table, fetching its schema and the first page of data.
    ///
    /// The two requests run concurrently, the function returns once both
    /// complete. If either fails the function returns the error.
    pub(crate) async fn read_table(
        inner: Arc<BigQuery>,
        reference: TableReference,
        max_results: Option<u32>,
        start_index: Option<u64>,
        options: RequestOptions,
    ) -> Result<Self> {
        let params = TableDataParams {
            max_results,
            start_index,
            page_token: String::new(),
        };
        let (table, page) = tokio::join!(
            inner.get_table(&reference, options.clone()),
            inner.list_table_data(&reference, &params, options.clone()),
        );
        let table = table?.into_body();
        let page = page?.into_body();
        let schema = table.schema.unwrap_or_default();
        Ok(Self {
            inner,
            source: Source::Table {
                reference,
                start_index,
            },
            options,
            max_results,
            page_token: page.page_token.filter(|t| !t.is_empty()),
            schema: Schema::new(schema),
            total_rows: page.total_rows.or(table.num_rows).unwrap_or_default(),
            rows: page.rows.into(),
        })
    }

    /// Returns the next row, `None` after the last row.
    pub async fn next(&mut self) -> Option<Result<Row>> {
        loop {
            if let Some(row) = self.rows.pop_front() {
                return Some(Row::try_new(row, self.schema.clone()));
            }
            let token = self.page_token.clone()?;
            if let Err(e) = self.fetch_next_page(token).await {
                return Some(Err(e));
            }
        }
    }

    /// The total number of rows in the result set or table.
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// The schema of the rows.
    pub fn schema(&self) -> TableSchema {
        self.schema.to_table_schema()
    }

    /// Converts the iterator into a [Stream] of rows.
    pub fn into_stream(self) -> impl Stream<Item = Result<Row>> + Send {
        futures::stream::unfold(self, |mut iter| async move {
            let row = iter.next().await?;
            Some((row, iter))
        })
    }

    async fn fetch_next_page(&mut self, token: String) -> Result<()> {
        tracing::debug!(page_token = %token, "fetching the next page of rows");
        let (page_token, total_rows, rows) = match &self.source {
            Source::Query(reference) => {
                let params = QueryResultsParams {
                    location: reference.location.clone(),
                    max_results: self.max_results,
                    page_token: token,
                    timeout_ms: None,
                };
                let page = self
                    .inner
                    .get_query_results(
                        &reference.project_id,
                        &reference.job_id,
                        &params,
                        self.options.clone(),
                    )
                    .await?
                    .into_body();
                if let Some(schema) = page.schema {
                    self.schema = Schema::new(schema);
                }
                (page.page_token, page.total_rows, page.rows)
            }
            Source::Table {
                reference,
                start_index,
            } => {
                let params = TableDataParams {
                    max_results: self.max_results,
                    page_token: token,
                    start_index: *start_index,
                };
                let page = self
                    .inner
                    .list_table_data(reference, &params, self.options.clone())
                    .await?
                    .into_body();
                (page.page_token, page.total_rows, page.rows)
            }
        };
        if let Some(total_rows) = total_rows {
            self.total_rows = total_rows;
        }
        self.page_token = page_token.filter(|t| !t.is_empty());
        self.rows.extend(rows);
        Ok(())
    }
}
