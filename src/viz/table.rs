//! Column-oriented table used as chart input.

use crate::error::ChartError;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Ordered columns of JSON cells, all of the same length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: IndexMap<String, Vec<Value>>,
    rows: usize,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs, keeping their order
    pub fn from_columns<I, K, V>(columns: I) -> Result<Self, ChartError>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name, values.into_iter().map(Into::into).collect())?;
        }
        Ok(table)
    }

    /// Build a table from row objects; columns appear in first-seen order
    /// and missing cells become null
    pub fn from_records(records: &[Value]) -> Result<Self, ChartError> {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            let object = record.as_object().ok_or_else(|| {
                ChartError::UnsupportedShape("rows must be JSON objects".to_string())
            })?;
            for key in object.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }

        let columns = names.into_iter().map(|name| {
            let values: Vec<Value> = records
                .iter()
                .map(|r| r.get(&name).cloned().unwrap_or(Value::Null))
                .collect();
            (name, values)
        });
        Self::from_columns(columns)
    }

    /// Accept either an array of row objects or an object of column arrays
    pub fn from_json(value: &Value) -> Result<Self, ChartError> {
        match value {
            Value::Array(records) => Self::from_records(records),
            Value::Object(map) => {
                let mut table = Self::new();
                for (name, column) in map {
                    let values = column.as_array().ok_or_else(|| {
                        ChartError::UnsupportedShape(format!("column '{}' is not an array", name))
                    })?;
                    table.push_column(name.clone(), values.clone())?;
                }
                Ok(table)
            }
            other => Err(ChartError::UnsupportedShape(format!(
                "expected an array or object, got {}",
                other
            ))),
        }
    }

    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), ChartError> {
        let name = name.into();
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(ChartError::LengthMismatch {
                column: name,
                expected: self.rows,
                found: values.len(),
            });
        }
        self.rows = values.len();
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Result<&[Value], ChartError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ChartError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Column as floats; numeric strings are accepted, anything else fails
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, ChartError> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, value)| {
                as_f64(value).ok_or_else(|| ChartError::NonNumeric {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Row indices grouped by the display value of `name`, in first-seen order
    pub fn group_rows(&self, name: &str) -> Result<IndexMap<String, Vec<usize>>, ChartError> {
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (row, value) in self.column(name)?.iter().enumerate() {
            groups.entry(label(value)).or_default().push(row);
        }
        Ok(groups)
    }
}

pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Text used for legend entries and category labels
pub(crate) fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Normalization of chart inputs into a [`DataTable`]
pub trait IntoDataTable {
    fn into_data_table(self) -> Result<DataTable, ChartError>;
}

impl IntoDataTable for DataTable {
    fn into_data_table(self) -> Result<DataTable, ChartError> {
        Ok(self)
    }
}

impl IntoDataTable for &DataTable {
    fn into_data_table(self) -> Result<DataTable, ChartError> {
        Ok(self.clone())
    }
}

impl<V: Into<Value>> IntoDataTable for IndexMap<String, Vec<V>> {
    fn into_data_table(self) -> Result<DataTable, ChartError> {
        DataTable::from_columns(self)
    }
}

impl<V: Into<Value>> IntoDataTable for BTreeMap<String, Vec<V>> {
    fn into_data_table(self) -> Result<DataTable, ChartError> {
        DataTable::from_columns(self)
    }
}

impl<V: Into<Value>> IntoDataTable for HashMap<String, Vec<V>> {
    fn into_data_table(self) -> Result<DataTable, ChartError> {
        // HashMap order is arbitrary; sort so charts are reproducible
        let sorted: BTreeMap<String, Vec<V>> = self.into_iter().collect();
        DataTable::from_columns(sorted)
    }
}

impl<K: Into<String>, V: Into<Value>> IntoDataTable for Vec<(K, Vec<V>)> {
    fn into_data_table(self) -> Result<DataTable, ChartError> {
        DataTable::from_columns(self)
    }
}

impl IntoDataTable for &Value {
    fn into_data_table(self) -> Result<DataTable, ChartError> {
        DataTable::from_json(self)
    }
}
