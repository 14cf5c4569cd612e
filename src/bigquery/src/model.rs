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

//! The BigQuery v2 REST resources used by this client.
//!
//! The types mirror the JSON representation of each resource. All fields are
//! optional or defaulted, the service decides which fields are present in
//! each response. 64-bit integers travel as strings in the REST API, the types
//! here accept both strings and numbers and serialize as strings.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::skip_serializing_none;
use std::collections::HashMap;

type Int64 = serde_with::PickFirst<(serde_with::DisplayFromStr, serde_with::Same)>;

/// A row in the REST format: `{"f": [{"v": ...}, ...]}`.
///
/// Use [Row][crate::row::Row] to read the values with a schema.
pub type TableRow = serde_json::Map<String, serde_json::Value>;

use gax::api_enum;

api_enum! {
    /// What to do when the destination table already exists.
    WriteDisposition {
        /// Overwrite the table data and schema.
        WriteTruncate => "WRITE_TRUNCATE",
        /// Append the data to the table.
        WriteAppend => "WRITE_APPEND",
        /// Fail if the table has data.
        WriteEmpty => "WRITE_EMPTY",
    }
}

api_enum! {
    /// Whether the job may create the destination table.
    CreateDisposition {
        CreateIfNeeded => "CREATE_IF_NEEDED",
        CreateNever => "CREATE_NEVER",
    }
}

api_enum! {
    /// The format of the files read by load jobs, or written by extract jobs.
    SourceFormat {
        Csv => "CSV",
        NewlineDelimitedJson => "NEWLINE_DELIMITED_JSON",
        Avro => "AVRO",
        Parquet => "PARQUET",
        Orc => "ORC",
        DatastoreBackup => "DATASTORE_BACKUP",
    }
}

api_enum! {
    /// The compression applied to the files written by extract jobs.
    Compression {
        None => "NONE",
        Gzip => "GZIP",
        Deflate => "DEFLATE",
        Snappy => "SNAPPY",
        Zstd => "ZSTD",
    }
}

api_enum! {
    /// The priority of a query job.
    Priority {
        Interactive => "INTERACTIVE",
        Batch => "BATCH",
    }
}

/// Identifies a dataset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

impl DatasetReference {
    pub fn new<P: Into<String>, D: Into<String>>(project_id: P, dataset_id: D) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
        }
    }
}

/// A dataset, the container for tables and views.
#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub id: Option<String>,
    pub self_link: Option<String>,
    pub dataset_reference: Option<DatasetReference>,
    pub friendly_name: Option<String>,
    pub description: Option<String>,
    #[serde_as(as = "Option<Int64>")]
    pub default_table_expiration_ms: Option<i64>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    pub location: Option<String>,
    #[serde_as(as = "Option<Int64>")]
    pub creation_time: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub last_modified_time: Option<i64>,
}

impl Dataset {
    pub fn new(reference: DatasetReference) -> Self {
        Self {
            dataset_reference: Some(reference),
            ..Default::default()
        }
    }

    pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = Some(v.into());
        self
    }

    pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
        self.location = Some(v.into());
        self
    }

    pub fn set_labels<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }
}

/// A summary of a dataset, as returned by `datasets.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasetListItem {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub dataset_reference: Option<DatasetReference>,
    pub labels: HashMap<String, String>,
    pub friendly_name: Option<String>,
    pub location: Option<String>,
}

/// The response of `datasets.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasetList {
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub next_page_token: Option<String>,
    pub datasets: Vec<DatasetListItem>,
}

impl gax::paginator::PageableResponse for DatasetList {
    type PageItem = DatasetListItem;

    fn items(self) -> Vec<Self::PageItem> {
        self.datasets
    }

    fn next_page_token(&self) -> String {
        self.next_page_token.clone().unwrap_or_default()
    }
}

/// Identifies a table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableReference {
    pub fn new<P, D, T>(project_id: P, dataset_id: D, table_id: T) -> Self
    where
        P: Into<String>,
        D: Into<String>,
        T: Into<String>,
    {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
        }
    }
}

/// Describes a single column, possibly with nested columns.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableFieldSchema {
    pub name: String,
    /// The column type, such as `STRING`, `INTEGER`, or `RECORD`.
    #[serde(rename = "type")]
    pub r#type: String,
    /// `NULLABLE`, `REQUIRED` or `REPEATED`.
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<TableFieldSchema>,
    pub description: Option<String>,
}

impl TableFieldSchema {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, r#type: T) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
            ..Default::default()
        }
    }

    pub fn set_mode<T: Into<String>>(mut self, v: T) -> Self {
        self.mode = Some(v.into());
        self
    }

    pub fn set_fields<T: IntoIterator<Item = TableFieldSchema>>(mut self, v: T) -> Self {
        self.fields = v.into_iter().collect();
        self
    }

    /// Returns true if the column is `REPEATED`.
    pub fn is_repeated(&self) -> bool {
        self.mode.as_deref() == Some("REPEATED")
    }
}

/// The schema of a table or a query result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableSchema {
    pub fields: Vec<TableFieldSchema>,
}

impl TableSchema {
    pub fn new<T: IntoIterator<Item = TableFieldSchema>>(fields: T) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }
}

/// Configures time-based partitioning for a table.
#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimePartitioning {
    /// `DAY`, `HOUR`, `MONTH` or `YEAR`.
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde_as(as = "Option<Int64>")]
    pub expiration_ms: Option<i64>,
    pub field: Option<String>,
    pub require_partition_filter: Option<bool>,
}

/// Configures clustering for a table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Clustering {
    pub fields: Vec<String>,
}

/// The definition of a logical view.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewDefinition {
    pub query: String,
    pub use_legacy_sql: Option<bool>,
}

/// A table, or a view.
#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub id: Option<String>,
    pub self_link: Option<String>,
    pub table_reference: Option<TableReference>,
    pub friendly_name: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    pub schema: Option<TableSchema>,
    pub time_partitioning: Option<TimePartitioning>,
    pub clustering: Option<Clustering>,
    pub view: Option<ViewDefinition>,
    #[serde_as(as = "Option<Int64>")]
    pub num_bytes: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub num_rows: Option<u64>,
    #[serde_as(as = "Option<Int64>")]
    pub creation_time: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub expiration_time: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub last_modified_time: Option<i64>,
    /// `TABLE`, `VIEW`, `EXTERNAL`, ...
    #[serde(rename = "type")]
    pub r#type: Option<String>,
    pub location: Option<String>,
}

impl Table {
    pub fn new(reference: TableReference) -> Self {
        Self {
            table_reference: Some(reference),
            ..Default::default()
        }
    }

    pub fn set_schema(mut self, v: TableSchema) -> Self {
        self.schema = Some(v);
        self
    }

    pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = Some(v.into());
        self
    }

    pub fn set_time_partitioning(mut self, v: TimePartitioning) -> Self {
        self.time_partitioning = Some(v);
        self
    }

    pub fn set_clustering<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.clustering = Some(Clustering {
            fields: v.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// A summary of a table, as returned by `tables.list`.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableListItem {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub table_reference: Option<TableReference>,
    pub friendly_name: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<String>,
    pub labels: HashMap<String, String>,
    #[serde_as(as = "Option<Int64>")]
    pub creation_time: Option<i64>,
}

/// The response of `tables.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableList {
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub next_page_token: Option<String>,
    pub tables: Vec<TableListItem>,
    pub total_items: Option<i64>,
}

impl gax::paginator::PageableResponse for TableList {
    type PageItem = TableListItem;

    fn items(self) -> Vec<Self::PageItem> {
        self.tables
    }

    fn next_page_token(&self) -> String {
        self.next_page_token.clone().unwrap_or_default()
    }
}

/// Identifies a job.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    pub location: Option<String>,
}

/// An error reported by the service.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorProto {
    pub reason: Option<String>,
    pub location: Option<String>,
    pub debug_info: Option<String>,
    pub message: Option<String>,
}

impl std::fmt::Display for ErrorProto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.reason.as_deref().unwrap_or("unknown"),
            self.message.as_deref().unwrap_or_default()
        )?;
        if let Some(location) = &self.location {
            write!(f, " (location: {location})")?;
        }
        Ok(())
    }
}

/// The state of a job.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobStatus {
    /// `PENDING`, `RUNNING` or `DONE`.
    pub state: String,
    /// Present when the job failed.
    pub error_result: Option<ErrorProto>,
    /// All the errors, some may be non-fatal.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorProto>,
}

impl JobStatus {
    /// Returns true if the job is complete, successfully or not.
    pub fn is_done(&self) -> bool {
        self.state == "DONE"
    }
}

/// Statistics for query jobs.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryStatistics {
    #[serde_as(as = "Option<Int64>")]
    pub total_bytes_processed: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub total_bytes_billed: Option<i64>,
    pub cache_hit: Option<bool>,
    #[serde_as(as = "Option<Int64>")]
    pub num_dml_affected_rows: Option<i64>,
    pub statement_type: Option<String>,
}

/// Statistics for load jobs.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadStatistics {
    #[serde_as(as = "Option<Int64>")]
    pub input_files: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub input_file_bytes: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub output_rows: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub output_bytes: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub bad_records: Option<i64>,
}

/// Statistics for extract jobs.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractStatistics {
    #[serde_as(as = "Vec<Int64>")]
    pub destination_uri_file_counts: Vec<i64>,
}

/// Statistics for a job.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobStatistics {
    #[serde_as(as = "Option<Int64>")]
    pub creation_time: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub start_time: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub end_time: Option<i64>,
    #[serde_as(as = "Option<Int64>")]
    pub total_bytes_processed: Option<i64>,
    pub query: Option<QueryStatistics>,
    pub load: Option<LoadStatistics>,
    pub extract: Option<ExtractStatistics>,
}

/// The type of a query parameter.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryParameterType {
    /// `STRING`, `INT64`, `ARRAY`, ...
    #[serde(rename = "type")]
    pub r#type: String,
    pub array_type: Option<Box<QueryParameterType>>,
}

/// The value of a query parameter.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryParameterValue {
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub array_values: Vec<QueryParameterValue>,
}

/// A parameter in a parameterized query.
///
/// Named parameters are referenced as `@name` in the query, positional
/// parameters (without a name) as `?`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryParameter {
    pub name: Option<String>,
    pub parameter_type: QueryParameterType,
    pub parameter_value: QueryParameterValue,
}

impl QueryParameter {
    /// A named scalar parameter, for example `("corpus", "STRING", "hamlet")`.
    pub fn named<N, T, V>(name: N, r#type: T, value: V) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        V: Into<String>,
    {
        Self {
            name: Some(name.into()),
            ..Self::positional(r#type, value)
        }
    }

    /// A positional scalar parameter.
    pub fn positional<T, V>(r#type: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<String>,
    {
        Self {
            name: None,
            parameter_type: QueryParameterType {
                r#type: r#type.into(),
                array_type: None,
            },
            parameter_value: QueryParameterValue {
                value: Some(value.into()),
                array_values: Vec::new(),
            },
        }
    }
}

/// Configures a query job.
#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfigurationQuery {
    pub query: String,
    pub destination_table: Option<TableReference>,
    pub create_disposition: Option<CreateDisposition>,
    pub write_disposition: Option<WriteDisposition>,
    pub priority: Option<Priority>,
    pub use_legacy_sql: Option<bool>,
    pub use_query_cache: Option<bool>,
    pub default_dataset: Option<DatasetReference>,
    /// `NAMED` or `POSITIONAL`.
    pub parameter_mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query_parameters: Vec<QueryParameter>,
    #[serde_as(as = "Option<Int64>")]
    pub maximum_bytes_billed: Option<i64>,
    pub allow_large_results: Option<bool>,
    pub flatten_results: Option<bool>,
}

/// Configures a load job.
#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfigurationLoad {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_uris: Vec<String>,
    pub destination_table: Option<TableReference>,
    pub schema: Option<TableSchema>,
    pub source_format: Option<SourceFormat>,
    pub create_disposition: Option<CreateDisposition>,
    pub write_disposition: Option<WriteDisposition>,
    #[serde_as(as = "Option<Int64>")]
    pub skip_leading_rows: Option<i64>,
    pub field_delimiter: Option<String>,
    pub autodetect: Option<bool>,
    pub max_bad_records: Option<i32>,
    pub allow_jagged_rows: Option<bool>,
    pub ignore_unknown_values: Option<bool>,
    pub time_partitioning: Option<TimePartitioning>,
    pub clustering: Option<Clustering>,
}

/// Configures an extract job.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfigurationExtract {
    pub source_table: Option<TableReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_uris: Vec<String>,
    pub destination_format: Option<SourceFormat>,
    pub compression: Option<Compression>,
    pub field_delimiter: Option<String>,
    pub print_header: Option<bool>,
}

/// Configures a copy job.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfigurationTableCopy {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_tables: Vec<TableReference>,
    pub destination_table: Option<TableReference>,
    pub create_disposition: Option<CreateDisposition>,
    pub write_disposition: Option<WriteDisposition>,
}

/// The configuration of a job. Exactly one of `query`, `load`, `extract` or
/// `copy` is set.
#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfiguration {
    pub job_type: Option<String>,
    pub query: Option<JobConfigurationQuery>,
    pub load: Option<JobConfigurationLoad>,
    pub extract: Option<JobConfigurationExtract>,
    pub copy: Option<JobConfigurationTableCopy>,
    pub dry_run: Option<bool>,
    #[serde_as(as = "Option<Int64>")]
    pub job_timeout_ms: Option<i64>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// A job: a query, load, extract or copy operation.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Job {
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub id: Option<String>,
    pub self_link: Option<String>,
    pub user_email: Option<String>,
    pub job_reference: Option<JobReference>,
    pub configuration: Option<JobConfiguration>,
    pub status: Option<JobStatus>,
    pub statistics: Option<JobStatistics>,
}

/// A summary of a job, as returned by `jobs.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListItem {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub job_reference: Option<JobReference>,
    pub state: Option<String>,
    pub error_result: Option<ErrorProto>,
    pub configuration: Option<JobConfiguration>,
    pub status: Option<JobStatus>,
    pub statistics: Option<JobStatistics>,
    pub user_email: Option<String>,
}

/// The response of `jobs.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobList {
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub next_page_token: Option<String>,
    pub jobs: Vec<JobListItem>,
}

impl gax::paginator::PageableResponse for JobList {
    type PageItem = JobListItem;

    fn items(self) -> Vec<Self::PageItem> {
        self.jobs
    }

    fn next_page_token(&self) -> String {
        self.next_page_token.clone().unwrap_or_default()
    }
}

/// The response of `jobs.cancel`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobCancelResponse {
    pub kind: Option<String>,
    pub job: Option<Job>,
}

/// Options for the format of query results.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataFormatOptions {
    /// Return timestamps as microseconds since the epoch.
    pub use_int64_timestamp: Option<bool>,
}

/// The request body of `jobs.query`.
#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    pub max_results: Option<u32>,
    pub default_dataset: Option<DatasetReference>,
    pub timeout_ms: Option<u32>,
    pub dry_run: Option<bool>,
    pub use_query_cache: Option<bool>,
    pub use_legacy_sql: Option<bool>,
    pub parameter_mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query_parameters: Vec<QueryParameter>,
    pub location: Option<String>,
    pub format_options: Option<DataFormatOptions>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    /// Makes the request idempotent, the service ignores duplicates.
    pub request_id: Option<String>,
    #[serde_as(as = "Option<Int64>")]
    pub maximum_bytes_billed: Option<i64>,
}

/// The response of `jobs.query`.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryResponse {
    pub kind: Option<String>,
    pub schema: Option<TableSchema>,
    pub job_reference: Option<JobReference>,
    #[serde_as(as = "Option<Int64>")]
    pub total_rows: Option<u64>,
    pub page_token: Option<String>,
    pub rows: Vec<TableRow>,
    #[serde_as(as = "Option<Int64>")]
    pub total_bytes_processed: Option<i64>,
    pub job_complete: Option<bool>,
    pub errors: Vec<ErrorProto>,
    pub cache_hit: Option<bool>,
    #[serde_as(as = "Option<Int64>")]
    pub num_dml_affected_rows: Option<i64>,
    pub query_id: Option<String>,
}

/// The response of `jobs.getQueryResults`.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetQueryResultsResponse {
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub schema: Option<TableSchema>,
    pub job_reference: Option<JobReference>,
    #[serde_as(as = "Option<Int64>")]
    pub total_rows: Option<u64>,
    pub page_token: Option<String>,
    pub rows: Vec<TableRow>,
    #[serde_as(as = "Option<Int64>")]
    pub total_bytes_processed: Option<i64>,
    pub job_complete: Option<bool>,
    pub errors: Vec<ErrorProto>,
    pub cache_hit: Option<bool>,
    #[serde_as(as = "Option<Int64>")]
    pub num_dml_affected_rows: Option<i64>,
}

impl From<QueryResponse> for GetQueryResultsResponse {
    fn from(value: QueryResponse) -> Self {
        Self {
            kind: value.kind,
            etag: None,
            schema: value.schema,
            job_reference: value.job_reference,
            total_rows: value.total_rows,
            page_token: value.page_token,
            rows: value.rows,
            total_bytes_processed: value.total_bytes_processed,
            job_complete: value.job_complete,
            errors: value.errors,
            cache_hit: value.cache_hit,
            num_dml_affected_rows: value.num_dml_affected_rows,
        }
    }
}

/// The response of `tabledata.list`.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableDataList {
    pub kind: Option<String>,
    pub etag: Option<String>,
    #[serde_as(as = "Option<Int64>")]
    pub total_rows: Option<u64>,
    pub page_token: Option<String>,
    pub rows: Vec<TableRow>,
}

/// A row in a streaming insert.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsertAllRow {
    /// Used by the service to deduplicate retried inserts.
    pub insert_id: Option<String>,
    pub json: serde_json::Map<String, serde_json::Value>,
}

/// The request body of `tabledata.insertAll`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableDataInsertAllRequest {
    pub skip_invalid_rows: Option<bool>,
    pub ignore_unknown_values: Option<bool>,
    pub template_suffix: Option<String>,
    pub rows: Vec<InsertAllRow>,
}

/// The errors for a single row in a streaming insert.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsertErrors {
    pub index: u32,
    pub errors: Vec<ErrorProto>,
}

/// The response of `tabledata.insertAll`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableDataInsertAllResponse {
    pub kind: Option<String>,
    pub insert_errors: Vec<InsertErrors>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(WriteDisposition::WriteTruncate, "WRITE_TRUNCATE")]
    #[test_case(WriteDisposition::WriteAppend, "WRITE_APPEND")]
    #[test_case(WriteDisposition::WriteEmpty, "WRITE_EMPTY")]
    #[test_case(WriteDisposition::UnknownValue("WRITE_NEW".into()), "WRITE_NEW")]
    fn write_disposition(value: WriteDisposition, name: &str) -> anyhow::Result<()> {
        assert_eq!(value.name(), name);
        assert_eq!(value.to_string(), name);
        assert_eq!(serde_json::to_value(&value)?, json!(name));
        assert_eq!(serde_json::from_value::<WriteDisposition>(json!(name))?, value);
        Ok(())
    }

    #[test]
    fn other_enums() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::from_value::<SourceFormat>(json!("NEWLINE_DELIMITED_JSON"))?,
            SourceFormat::NewlineDelimitedJson
        );
        assert_eq!(serde_json::to_value(Compression::Gzip)?, json!("GZIP"));
        assert_eq!(Priority::from("BATCH"), Priority::Batch);
        assert_eq!(
            CreateDisposition::from("CREATE_SOMETIMES"),
            CreateDisposition::UnknownValue("CREATE_SOMETIMES".into())
        );
        Ok(())
    }

    #[test]
    fn int64_as_string() -> anyhow::Result<()> {
        let table = serde_json::from_value::<Table>(json!({
            "numRows": "123",
            "numBytes": 456,
            "creationTime": "1700000000000",
        }))?;
        assert_eq!(table.num_rows, Some(123));
        assert_eq!(table.num_bytes, Some(456));
        assert_eq!(table.creation_time, Some(1_700_000_000_000));
        let got = serde_json::to_value(&table)?;
        assert_eq!(
            got,
            json!({
                "numRows": "123",
                "numBytes": "456",
                "creationTime": "1700000000000",
            })
        );
        Ok(())
    }

    #[test]
    fn skips_unset_fields() -> anyhow::Result<()> {
        let dataset = Dataset::new(DatasetReference::new("p", "d"))
            .set_location("US")
            .set_labels([("env", "test")]);
        let got = serde_json::to_value(&dataset)?;
        assert_eq!(
            got,
            json!({
                "datasetReference": {"projectId": "p", "datasetId": "d"},
                "location": "US",
                "labels": {"env": "test"},
            })
        );
        Ok(())
    }

    #[test]
    fn schema_round_trip_with_nested_fields() -> anyhow::Result<()> {
        let input = json!({"fields": [
            {"name": "id", "type": "INTEGER", "mode": "REQUIRED"},
            {"name": "tags", "type": "STRING", "mode": "REPEATED"},
            {"name": "address", "type": "RECORD", "fields": [
                {"name": "city", "type": "STRING"},
            ]},
        ]});
        let schema = serde_json::from_value::<TableSchema>(input.clone())?;
        assert!(schema.fields[1].is_repeated());
        assert_eq!(schema.fields[2].fields[0].name, "city");
        assert_eq!(serde_json::to_value(&schema)?, input);
        Ok(())
    }

    #[test]
    fn query_parameters() -> anyhow::Result<()> {
        let got = serde_json::to_value(QueryParameter::named("corpus", "STRING", "hamlet"))?;
        assert_eq!(
            got,
            json!({
                "name": "corpus",
                "parameterType": {"type": "STRING"},
                "parameterValue": {"value": "hamlet"},
            })
        );
        let got = serde_json::to_value(QueryParameter::positional("INT64", "42"))?;
        assert_eq!(
            got,
            json!({
                "parameterType": {"type": "INT64"},
                "parameterValue": {"value": "42"},
            })
        );
        Ok(())
    }

    #[test]
    fn error_proto_display() {
        let e = ErrorProto {
            reason: Some("invalidQuery".into()),
            location: Some("query".into()),
            debug_info: None,
            message: Some("Syntax error".into()),
        };
        assert_eq!(e.to_string(), "invalidQuery: Syntax error (location: query)");
    }
}
