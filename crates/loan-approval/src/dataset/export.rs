use std::io::Write;

use super::{Dataset, DatasetError};
use crate::scoring::BatchPrediction;

pub const PREDICTION_COLUMNS: [&str; 3] = ["prediction", "prediction_text", "confidence"];

/// Write the uploaded rows followed by their prediction columns.
///
/// `confidence` is written as a percentage to match what reviewers see.
pub fn write_predictions<W: Write>(
    dataset: &Dataset,
    batch: &BatchPrediction,
    writer: W,
) -> Result<(), DatasetError> {
    if batch.len() != dataset.row_count() {
        return Err(DatasetError::PredictionMismatch {
            rows: dataset.row_count(),
            predictions: batch.len(),
        });
    }

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = dataset.column_names();
    header.extend(PREDICTION_COLUMNS);
    csv_writer.write_record(&header)?;

    for (row, prediction) in batch.predictions.iter().enumerate() {
        let mut record: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| column.cell_text(row).unwrap_or_default())
            .collect();
        record.push(prediction.decision.label().to_string());
        record.push(prediction.decision.display_text().to_string());
        record.push(format!("{:.2}", prediction.confidence_pct()));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{LoanDecision, Prediction};

    fn batch(decisions: &[(LoanDecision, f64)]) -> BatchPrediction {
        BatchPrediction {
            predictions: decisions
                .iter()
                .map(|(decision, confidence)| Prediction {
                    decision: *decision,
                    confidence: *confidence,
                })
                .collect(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn appends_prediction_columns() {
        let dataset = Dataset::from_reader("name,income\nAna,52000\nOmar,\n".as_bytes())
            .expect("csv parses");
        let batch = batch(&[
            (LoanDecision::Approved, 0.8125),
            (LoanDecision::Rejected, 0.6),
        ]);

        let mut output = Vec::new();
        write_predictions(&dataset, &batch, &mut output).expect("export succeeds");

        let text = String::from_utf8(output).expect("utf8 output");
        assert_eq!(
            text,
            "name,income,prediction,prediction_text,confidence\n\
Ana,52000,1,APPROVED,81.25\n\
Omar,,0,REJECTED,60.00\n"
        );
    }

    #[test]
    fn export_reproduces_uploaded_number_formatting() {
        let dataset = Dataset::from_reader("id,income\n00123,85000.00\n".as_bytes())
            .expect("csv parses");
        let batch = batch(&[(LoanDecision::Approved, 0.75)]);

        let mut output = Vec::new();
        write_predictions(&dataset, &batch, &mut output).expect("export succeeds");

        let text = String::from_utf8(output).expect("utf8 output");
        assert_eq!(
            text.lines().nth(1),
            Some("00123,85000.00,1,APPROVED,75.00")
        );
    }

    #[test]
    fn refuses_misaligned_predictions() {
        let dataset =
            Dataset::from_reader("income\n52000\n61000\n".as_bytes()).expect("csv parses");
        let batch = batch(&[(LoanDecision::Approved, 0.9)]);

        let err = write_predictions(&dataset, &batch, Vec::<u8>::new()).expect_err("rows differ");
        assert!(matches!(
            err,
            DatasetError::PredictionMismatch {
                rows: 2,
                predictions: 1
            }
        ));
    }
}
