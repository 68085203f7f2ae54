use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ColumnKind, ColumnValues, Dataset};

/// Column holding the historical outcome in labelled uploads.
pub const OUTCOME_COLUMN: &str = "loan_approved";

/// Headline figures for an uploaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<usize>,
    /// Share of rows with a positive outcome, in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_rate: Option<f64>,
}

pub fn overview(dataset: &Dataset) -> DatasetOverview {
    let missing_cells = dataset
        .columns()
        .iter()
        .map(|column| column.null_count())
        .sum();

    let approved = dataset.column(OUTCOME_COLUMN).map(|column| match column.values() {
        ColumnValues::Numeric(values) => values.iter().filter(|v| **v == Some(1.0)).count(),
        ColumnValues::Text(values) => values
            .iter()
            .flatten()
            .filter(|v| v.eq_ignore_ascii_case("true") || v.as_str() == "1")
            .count(),
    });

    let approval_rate = approved
        .filter(|_| dataset.row_count() > 0)
        .map(|count| count as f64 / dataset.row_count() as f64);

    DatasetOverview {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        missing_cells,
        approved,
        approval_rate,
    }
}

/// `describe()`-style statistics for one numeric column. Undefined values
/// (no observations, or a single one for `std`) are NaN and serialize as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

pub fn describe(dataset: &Dataset) -> Vec<ColumnStatistics> {
    dataset
        .columns()
        .iter()
        .filter_map(|column| match column.values() {
            ColumnValues::Numeric(values) => Some(column_statistics(column.name(), values)),
            ColumnValues::Text(_) => None,
        })
        .collect()
}

fn column_statistics(name: &str, values: &[Option<f64>]) -> ColumnStatistics {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    observed.sort_by(|a, b| a.total_cmp(b));

    let count = observed.len();
    let mean = if count == 0 {
        f64::NAN
    } else {
        observed.iter().sum::<f64>() / count as f64
    };
    let std = if count < 2 {
        f64::NAN
    } else {
        let variance = observed
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    };

    ColumnStatistics {
        column: name.to_string(),
        count,
        mean,
        std,
        min: observed.first().copied().unwrap_or(f64::NAN),
        p25: quantile(&observed, 0.25),
        p50: quantile(&observed, 0.5),
        p75: quantile(&observed, 0.75),
        max: observed.last().copied().unwrap_or(f64::NAN),
    }
}

/// Linear-interpolated quantile over sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Per-column type and null counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeSummary {
    pub column: String,
    pub kind: ColumnKind,
    pub non_null: usize,
    pub nulls: usize,
}

pub fn column_types(dataset: &Dataset) -> Vec<ColumnTypeSummary> {
    dataset
        .columns()
        .iter()
        .map(|column| ColumnTypeSummary {
            column: column.name().to_string(),
            kind: column.kind(),
            non_null: column.non_null_count(),
            nulls: column.null_count(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Frequency of each distinct value, most frequent first. Missing cells are
/// skipped. `None` if the column does not exist.
pub fn value_counts(dataset: &Dataset, column: &str) -> Option<Vec<ValueCount>> {
    let column = dataset.column(column)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..column.len() {
        if let Some(value) = column.cell_text(row) {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut counts: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    Some(counts)
}

/// Everything shown when an applicant file is first uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub overview: DatasetOverview,
    pub column_types: Vec<ColumnTypeSummary>,
    pub statistics: Vec<ColumnStatistics>,
}

pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    DatasetSummary {
        overview: overview(dataset),
        column_types: column_types(dataset),
        statistics: describe(dataset),
    }
}
