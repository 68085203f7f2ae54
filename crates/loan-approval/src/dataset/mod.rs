//! Uploaded applicant tables: loading, summaries, display bands and export.

pub mod display;
pub mod export;
mod parser;
pub mod summary;

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Error raised while reading or writing a tabular dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no header row")]
    Empty,
    #[error("dataset has {rows} rows but {predictions} predictions were supplied")]
    PredictionMismatch { rows: usize, predictions: usize },
}

/// Storage type inferred for a column when the file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

/// A named column; `None` cells are missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
    /// Cell text as uploaded, kept for numeric columns read from a file.
    source_text: Option<Vec<Option<String>>>,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
            source_text: None,
        }
    }

    /// Keep the uploaded text of each cell so exports reproduce it verbatim.
    pub fn with_source_text(mut self, text: Vec<Option<String>>) -> Self {
        debug_assert_eq!(text.len(), self.len());
        self.source_text = Some(text);
        self
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Text(values),
            source_text: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        match self.values {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(values) => values.len(),
            ColumnValues::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnValues::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    pub fn non_null_count(&self) -> usize {
        self.len() - self.null_count()
    }

    /// Cell rendered as text, `None` when missing. Numeric cells loaded from
    /// a file come back exactly as uploaded.
    pub fn cell_text(&self, row: usize) -> Option<String> {
        if let Some(text) = &self.source_text {
            return text.get(row).cloned().flatten();
        }
        match &self.values {
            ColumnValues::Numeric(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(|value| value.to_string()),
            ColumnValues::Text(values) => values.get(row).cloned().flatten(),
        }
    }
}

/// Column-oriented table loaded from CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let (columns, rows) = parser::parse_columns(reader)?;
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Values of a numeric column; `None` if absent or textual.
    pub fn numeric_values(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.values {
            ColumnValues::Numeric(values) => Some(values),
            ColumnValues::Text(_) => None,
        }
    }

    /// First `limit` rows rendered as text, in column order.
    pub fn preview(&self, limit: usize) -> Vec<Vec<Option<String>>> {
        (0..self.rows.min(limit))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| column.cell_text(row))
                    .collect()
            })
            .collect()
    }

    /// Replace a same-named column or append a new one.
    pub(crate) fn set_column(&mut self, column: Column) {
        debug_assert_eq!(column.len(), self.rows);
        match self.columns.iter_mut().find(|existing| existing.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }
}
