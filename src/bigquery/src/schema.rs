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

use crate::model::{TableFieldSchema, TableSchema};
use std::slice::Iter;
use std::sync::Arc;

/// The schema used to interpret rows.
///
/// Shared by all the rows in a result set, cloning is cheap.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Schema {
    fields: Arc<Vec<TableFieldSchema>>,
}

impl Schema {
    pub(crate) fn new(schema: TableSchema) -> Self {
        Self {
            fields: Arc::new(schema.fields),
        }
    }

    /// The schema of the nested columns in a `RECORD` column.
    pub(crate) fn new_from_field(field: &TableFieldSchema) -> Self {
        Self {
            fields: Arc::new(field.fields.clone()),
        }
    }

    pub(crate) fn get_field(&self, name: &str) -> Option<&TableFieldSchema> {
        self.fields().find(|f| f.name == name)
    }

    pub(crate) fn fields(&self) -> Iter<'_, TableFieldSchema> {
        self.fields.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn to_table_schema(&self) -> TableSchema {
        TableSchema::new(self.fields.iter().cloned())
    }
}
