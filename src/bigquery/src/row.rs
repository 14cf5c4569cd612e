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
use crate::model::TableRow;
use crate::schema::Schema;
use crate::value::FromSql;
use serde_json::{Map, Number, Value};

/// A row in a query result or a table.
///
/// The values are converted from the BigQuery wire format
/// (`{"f": [{"v": ...}, ...]}`) into a JSON object keyed by column name.
/// `INTEGER`, `FLOAT` and `BOOLEAN` columns become JSON numbers and booleans,
/// `RECORD` columns become nested objects, and `REPEATED` columns become
/// arrays. All other types keep the string representation returned by the
/// service.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    values: Map<String, Value>,
    schema: Schema,
}

impl Row {
    pub(crate) fn try_new(row: TableRow, schema: Schema) -> Result<Self> {
        let values = convert_row(row, &schema)?;
        Ok(Self { values, schema })
    }

    /// Returns the value of column `name`, `None` if the value is `NULL`.
    ///
    /// # Example
    /// ```
    /// # use cloudkit_bigquery::row::Row;
    /// # fn sample(row: Row) -> gax::Result<()> {
    /// let name = row.get::<String>("name")?;
    /// let when = row.get::<chrono::DateTime<chrono::Utc>>("created")?;
    /// # Ok(()) }
    /// ```
    pub fn get<T: FromSql>(&self, name: &str) -> Result<Option<T>> {
        if self.schema.get_field(name).is_none() {
            return Err(crate::Error::deser(ParsingError::MissingField {
                field: name.to_string(),
            }));
        }
        let Some(value) = self.values.get(name).cloned() else {
            return Ok(None);
        };
        Option::<T>::from_sql(value).map_err(|source| {
            crate::Error::deser(ParsingError::Conversion {
                field: name.to_string(),
                source,
            })
        })
    }

    /// Deserializes the full row into `T`.
    ///
    /// Use [value::deserialize][crate::value::deserialize] for fields that
    /// need conversions, such as timestamps.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(crate::Error::deser)
    }

    /// The converted values as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// The number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Represents errors that can occur when parsing rows.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ParsingError {
    /// The column is not part of the schema.
    #[error("the column {field} is not in the schema")]
    MissingField { field: String },
    /// The row does not have an `f` attribute.
    #[error("attribute 'f' field is missing")]
    MissingValueFields,
    /// The `f` attribute is not a list.
    #[error("row 'f' field is not a list")]
    InvalidValueFields,
    /// A cell is not an object with a `v` attribute.
    #[error("field value is not an object with a 'v' attribute")]
    InvalidFieldValue,
    /// The value cannot be converted to the column type.
    #[error("cannot convert {value:?} to {field_type}")]
    UnknownFieldValueType { field_type: String, value: Value },
    /// The number of cells does not match the number of columns.
    #[error("schema/row length mismatch, the schema has {schema} columns and the row {row}")]
    SchemaMismatch { schema: usize, row: usize },
    /// The column value cannot be converted to the requested type.
    #[error("cannot convert column {field}: {source}")]
    Conversion {
        field: String,
        #[source]
        source: crate::value::Error,
    },
}

fn get_field_list(mut row: TableRow) -> Result<Vec<Value>> {
    match row.remove("f") {
        None => Err(crate::Error::deser(ParsingError::MissingValueFields)),
        Some(Value::Array(v)) => Ok(v),
        Some(_) => Err(crate::Error::deser(ParsingError::InvalidValueFields)),
    }
}

fn get_field_value(cell: Value) -> Result<Value> {
    match cell {
        Value::Object(mut o) => o
            .remove("v")
            .ok_or_else(|| crate::Error::deser(ParsingError::InvalidFieldValue)),
        _ => Err(crate::Error::deser(ParsingError::InvalidFieldValue)),
    }
}

pub(crate) fn convert_row(row: TableRow, schema: &Schema) -> Result<Map<String, Value>> {
    let cells = get_field_list(row)?;
    if cells.len() != schema.len() {
        return Err(crate::Error::deser(ParsingError::SchemaMismatch {
            schema: schema.len(),
            row: cells.len(),
        }));
    }

    let mut values = Map::new();
    for (cell, field) in cells.into_iter().zip(schema.fields()) {
        let value = get_field_value(cell)?;
        let nested = Schema::new_from_field(field);
        let value = convert_value(value, &field.r#type, &nested)?;
        values.insert(field.name.clone(), value);
    }
    Ok(values)
}

fn convert_value(value: Value, field_type: &str, schema: &Schema) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(v) => convert_basic_type(v, field_type),
        Value::Object(v) => convert_row(v, schema).map(Value::Object),
        Value::Array(v) => convert_repeated(v, field_type, schema),
        value => Err(crate::Error::deser(ParsingError::UnknownFieldValueType {
            field_type: field_type.to_string(),
            value,
        })),
    }
}

fn convert_repeated(cells: Vec<Value>, field_type: &str, schema: &Schema) -> Result<Value> {
    let values = cells
        .into_iter()
        .map(|cell| {
            // each cell contains a single entry, keyed by "v"
            let value = get_field_value(cell)?;
            convert_value(value, field_type, schema)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Array(values))
}

fn convert_basic_type(value: String, field_type: &str) -> Result<Value> {
    let mismatch = |value: String| {
        crate::Error::deser(ParsingError::UnknownFieldValueType {
            field_type: field_type.to_string(),
            value: Value::String(value),
        })
    };
    match field_type {
        "STRING" | "BYTES" | "TIMESTAMP" | "DATE" | "TIME" | "DATETIME" | "NUMERIC"
        | "BIGNUMERIC" | "GEOGRAPHY" | "JSON" | "INTERVAL" => Ok(Value::String(value)),
        "INTEGER" | "INT64" => match value.parse::<i64>() {
            Ok(n) => Ok(Value::Number(n.into())),
            Err(_) => Err(mismatch(value)),
        },
        "FLOAT" | "FLOAT64" => {
            let Ok(n) = value.parse::<f64>() else {
                return Err(mismatch(value));
            };
            // NaN and infinities have no JSON representation.
            Ok(Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::String(value)))
        }
        "BOOLEAN" | "BOOL" => match value.parse::<bool>() {
            Ok(b) => Ok(Value::Bool(b)),
            Err(_) => Err(mismatch(value)),
        },
        _ => Err(mismatch(value)),
    }
}
