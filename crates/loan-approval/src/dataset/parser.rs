use std::io::Read;

use super::{Column, DatasetError};

// Markers treated as missing, in addition to empty cells.
const MISSING_MARKERS: &[&str] = &["na", "n/a", "nan", "null", "none"];

pub(crate) fn parse_columns<R: Read>(reader: R) -> Result<(Vec<Column>, usize), DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|header| header.is_empty()) {
        return Err(DatasetError::Empty);
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut rows = 0;
    for record in csv_reader.records() {
        let record = record?;
        for (index, value) in record.iter().enumerate() {
            cells[index].push(missing_as_none(value));
        }
        rows += 1;
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();

    Ok((columns, rows))
}

fn missing_as_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A column is numeric when every present cell parses as a number.
fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            Some(text) => text.parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::numeric(name, numbers).with_source_text(values),
        None => Column::text(name, values),
    }
}
