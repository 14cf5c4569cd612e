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

//! Streaming inserts into a BigQuery table.

use crate::Result;
use crate::model::{ErrorProto, InsertAllRow, TableDataInsertAllRequest, TableReference};
use crate::transport::BigQuery;
use gax::error::Error;
use gax::options::RequestOptions;
use serde::Serialize;
use std::sync::Arc;

/// Represents errors in streaming inserts.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum InsertError {
    /// The service rejected some of the rows.
    ///
    /// Unless [skip_invalid_rows][Inserter::with_skip_invalid_rows] is set,
    /// the service rejects all the rows in a request if any of them is
    /// invalid.
    #[error("{} rows failed to insert", .0.len())]
    RowErrors(Vec<RowInsertionError>),
    /// Rows must serialize as JSON objects.
    #[error("row {0} is not a JSON object")]
    NotAnObject(usize),
}

/// The errors for one of the inserted rows.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct RowInsertionError {
    /// The position of the row in the `put()` call.
    pub index: u32,
    pub insert_id: Option<String>,
    pub errors: Vec<ErrorProto>,
}

impl std::fmt::Display for RowInsertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}:", self.index)?;
        for e in &self.errors {
            write!(f, " {e};")?;
        }
        Ok(())
    }
}

/// A row with an explicit insert id.
///
/// The service uses the insert id to discard duplicate rows, for example
/// when the application retries a failed `put()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsertRow {
    pub insert_id: Option<String>,
    pub json: serde_json::Map<String, serde_json::Value>,
}

impl InsertRow {
    pub fn new(json: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            insert_id: None,
            json,
        }
    }

    pub fn with_insert_id<T: Into<String>>(mut self, v: T) -> Self {
        self.insert_id = Some(v.into());
        self
    }
}

/// Uploads rows to a table using the streaming API.
///
/// # Example
/// ```
/// # use cloudkit_bigquery::client::Client;
/// #[derive(serde::Serialize)]
/// struct Item { name: String, size: i64 }
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let inserter = client.inserter("my-project", "my_dataset", "my_table");
///     inserter
///         .put([Item { name: "n1".into(), size: 7 }, Item { name: "n2".into(), size: 3 }])
///         .await?;
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Inserter {
    inner: Arc<BigQuery>,
    reference: TableReference,
    skip_invalid_rows: bool,
    ignore_unknown_values: bool,
    template_suffix: Option<String>,
    options: RequestOptions,
}

impl Inserter {
    pub(crate) fn new(inner: Arc<BigQuery>, reference: TableReference) -> Self {
        Self {
            inner,
            reference,
            skip_invalid_rows: false,
            ignore_unknown_values: false,
            template_suffix: None,
            options: RequestOptions::default(),
        }
    }

    /// Insert the valid rows even if some rows are invalid.
    pub fn with_skip_invalid_rows(mut self, v: bool) -> Self {
        self.skip_invalid_rows = v;
        self
    }

    /// Ignore values that do not match the table schema.
    pub fn with_ignore_unknown_values(mut self, v: bool) -> Self {
        self.ignore_unknown_values = v;
        self
    }

    /// Insert into `{table}{suffix}`, creating it from the table schema if
    /// needed.
    pub fn with_template_suffix<T: Into<String>>(mut self, v: T) -> Self {
        self.template_suffix = Some(v.into());
        self
    }

    /// Inserts rows that serialize to JSON objects.
    ///
    /// Each row gets a random insert id.
    pub async fn put<I, T>(&self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| match serde_json::to_value(row).map_err(Error::ser)? {
                serde_json::Value::Object(json) => Ok(InsertRow::new(json)),
                _ => Err(Error::ser(InsertError::NotAnObject(i))),
            })
            .collect::<Result<Vec<_>>>()?;
        self.put_rows(rows).await
    }

    /// Inserts rows, keeping any insert ids set by the application.
    #[tracing::instrument(skip_all, fields(table = %self.reference.table_id))]
    pub async fn put_rows<I>(&self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = InsertRow>,
    {
        let rows: Vec<InsertAllRow> = rows
            .into_iter()
            .map(|r| InsertAllRow {
                insert_id: Some(
                    r.insert_id
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                ),
                json: r.json,
            })
            .collect();
        if rows.is_empty() {
            return Ok(());
        }
        tracing::debug!(rows = rows.len(), "inserting rows");
        let insert_ids: Vec<_> = rows.iter().map(|r| r.insert_id.clone()).collect();
        let request = TableDataInsertAllRequest {
            skip_invalid_rows: self.skip_invalid_rows.then_some(true),
            ignore_unknown_values: self.ignore_unknown_values.then_some(true),
            template_suffix: self.template_suffix.clone(),
            rows,
        };
        let response = self
            .inner
            .insert_all(&self.reference, request, self.options.clone())
            .await?
            .into_body();
        if response.insert_errors.is_empty() {
            return Ok(());
        }
        let errors = response
            .insert_errors
            .into_iter()
            .map(|e| RowInsertionError {
                index: e.index,
                insert_id: insert_ids.get(e.index as usize).cloned().flatten(),
                errors: e.errors,
            })
            .collect();
        Err(Error::deser(InsertError::RowErrors(errors)))
    }
}

#[doc(hidden)]
impl gax::options::internal::RequestBuilder for Inserter {
    fn request_options(&mut self) -> &mut RequestOptions {
        &mut self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = RowInsertionError {
            index: 2,
            insert_id: None,
            errors: vec![ErrorProto {
                reason: Some("invalid".into()),
                message: Some("no such field: x".into()),
                ..Default::default()
            }],
        };
        assert_eq!(err.to_string(), "row 2: invalid: no such field: x;");
        let err = InsertError::RowErrors(vec![err]);
        assert_eq!(err.to_string(), "1 rows failed to insert");
    }

    #[test]
    fn insert_row() {
        let mut json = serde_json::Map::new();
        json.insert("a".into(), 1.into());
        let row = InsertRow::new(json.clone()).with_insert_id("id-1");
        assert_eq!(row.insert_id.as_deref(), Some("id-1"));
        assert_eq!(row.json, json);
    }
}
