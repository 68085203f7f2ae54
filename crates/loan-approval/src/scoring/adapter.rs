use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{
    ApplicantRecord, BatchPrediction, DomainWarning, LoanDecision, Prediction, ScoredApplicant,
};
use super::features::{FeatureColumn, FeatureMatrix};
use super::model::{Classifier, ModelError, ModelState};
use crate::dataset::Dataset;

/// Error raised by the inference adapter.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model unavailable: {0}")]
    UnavailableModel(String),
    #[error("missing required column(s): {}", .columns.join(", "))]
    MissingFeature { columns: Vec<String> },
    #[error("column '{column}' must contain numeric values")]
    NonNumericFeature { column: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Builds fixed-order feature tables and normalizes classifier output.
///
/// Single-record scoring runs through the batch path so both produce the
/// same result for the same applicant.
#[derive(Debug, Clone)]
pub struct InferenceAdapter {
    model: ModelState,
}

impl InferenceAdapter {
    pub fn new(model: ModelState) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }

    fn classifier(&self) -> Result<&dyn Classifier, InferenceError> {
        match &self.model {
            ModelState::Loaded(classifier) => Ok(classifier.as_ref()),
            ModelState::Unavailable(reason) => {
                Err(InferenceError::UnavailableModel(reason.clone()))
            }
        }
    }

    pub fn predict_one(&self, record: &ApplicantRecord) -> Result<Prediction, InferenceError> {
        self.score_one(record).map(|scored| scored.prediction)
    }

    /// Single-record scoring that keeps the warnings raised by the batch path.
    pub fn score_one(&self, record: &ApplicantRecord) -> Result<ScoredApplicant, InferenceError> {
        let BatchPrediction {
            predictions,
            warnings,
        } = self.predict_batch(std::slice::from_ref(record))?;
        let prediction = predictions.into_iter().next().ok_or_else(|| {
            InferenceError::Model(ModelError::ShapeMismatch {
                expected: 1,
                actual: 0,
            })
        })?;

        Ok(ScoredApplicant {
            record: *record,
            prediction,
            warnings,
        })
    }

    /// Score an applicant submitted as a JSON object. Every absent raw
    /// attribute is reported before the model is called.
    pub fn score_json(&self, value: &Value) -> Result<ScoredApplicant, InferenceError> {
        self.classifier()?;
        let record = applicant_from_json(value)?;
        self.score_one(&record)
    }

    /// Score every record with one `predict` and one `predict_proba` call.
    pub fn predict_batch(
        &self,
        records: &[ApplicantRecord],
    ) -> Result<BatchPrediction, InferenceError> {
        let classifier = self.classifier()?;
        if records.is_empty() {
            return Ok(BatchPrediction::default());
        }

        let warnings = domain_warnings(records);
        let matrix = FeatureMatrix::from_records(records);
        debug!(
            model = classifier.name(),
            rows = matrix.len(),
            "invoking classifier"
        );

        let labels = classifier.predict(&matrix)?;
        ensure_row_count(records.len(), labels.len())?;
        let probabilities = classifier.predict_proba(&matrix)?;
        ensure_row_count(records.len(), probabilities.len())?;

        let predictions = labels
            .into_iter()
            .zip(probabilities)
            .enumerate()
            .map(|(row, (label, probabilities))| normalize(row, label, probabilities))
            .collect::<Result<Vec<_>, _>>()?;

        let batch = BatchPrediction {
            predictions,
            warnings,
        };
        let summary = batch.summary();
        info!(
            rows = summary.total,
            approved = summary.approved,
            rejected = summary.rejected,
            warnings = batch.warnings.len(),
            "batch scored"
        );

        Ok(batch)
    }

    /// Score every row of an uploaded table. All raw columns must be present
    /// before any row is processed.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Result<BatchPrediction, InferenceError> {
        self.classifier()?;
        let records = applicant_records(dataset)?;
        self.predict_batch(&records)
    }
}

/// Extract applicant records from a table; empty cells become NaN.
pub fn applicant_records(dataset: &Dataset) -> Result<Vec<ApplicantRecord>, InferenceError> {
    let missing: Vec<String> = FeatureColumn::RAW
        .iter()
        .filter(|column| dataset.column(column.name()).is_none())
        .map(|column| column.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InferenceError::MissingFeature { columns: missing });
    }

    let mut raw = Vec::with_capacity(FeatureColumn::RAW.len());
    for column in FeatureColumn::RAW {
        let values = dataset.numeric_values(column.name()).ok_or_else(|| {
            InferenceError::NonNumericFeature {
                column: column.name().to_string(),
            }
        })?;
        raw.push(values);
    }

    let records = (0..dataset.row_count())
        .map(|row| {
            let cell = |index: usize| raw[index][row].unwrap_or(f64::NAN);
            ApplicantRecord {
                income: cell(0),
                credit_score: cell(1),
                loan_amount: cell(2),
                years_employed: cell(3),
                points: cell(4),
            }
        })
        .collect();

    Ok(records)
}

/// Read one applicant from a JSON object; absent or null attributes count as
/// missing columns.
pub fn applicant_from_json(value: &Value) -> Result<ApplicantRecord, InferenceError> {
    let fields = value.as_object();
    let lookup = |column: FeatureColumn| {
        fields
            .and_then(|fields| fields.get(column.name()))
            .filter(|field| !field.is_null())
    };

    let missing: Vec<String> = FeatureColumn::RAW
        .iter()
        .filter(|column| lookup(**column).is_none())
        .map(|column| column.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InferenceError::MissingFeature { columns: missing });
    }

    let mut raw = [0.0; 5];
    for (slot, column) in raw.iter_mut().zip(FeatureColumn::RAW) {
        *slot = lookup(column).and_then(Value::as_f64).ok_or_else(|| {
            InferenceError::NonNumericFeature {
                column: column.name().to_string(),
            }
        })?;
    }

    Ok(ApplicantRecord {
        income: raw[0],
        credit_score: raw[1],
        loan_amount: raw[2],
        years_employed: raw[3],
        points: raw[4],
    })
}

fn domain_warnings(records: &[ApplicantRecord]) -> Vec<DomainWarning> {
    let mut warnings = Vec::new();
    for (row, record) in records.iter().enumerate() {
        for (column, value) in record.out_of_domain() {
            warn!(row, column = column.name(), value, "value outside expected range");
            warnings.push(DomainWarning { row, column, value });
        }
    }
    warnings
}

fn ensure_row_count(expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch { expected, actual })
    }
}

fn normalize(row: usize, label: u8, probabilities: [f64; 2]) -> Result<Prediction, ModelError> {
    let decision = LoanDecision::from_label(label).ok_or_else(|| {
        ModelError::InvalidOutput(format!("row {row}: unknown class label {label}"))
    })?;

    if probabilities
        .iter()
        .any(|probability| !(0.0..=1.0).contains(probability))
    {
        return Err(ModelError::InvalidOutput(format!(
            "row {row}: probabilities {probabilities:?} outside [0, 1]"
        )));
    }

    Ok(Prediction {
        decision,
        confidence: probabilities[0].max(probabilities[1]),
    })
}
