use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::scoring::domain::ApplicantRecord;
use crate::scoring::features::{FeatureColumn, FeatureMatrix, FEATURE_COUNT};
use crate::scoring::model::{Classifier, ModelError, ModelState};
use crate::scoring::{prediction_router, InferenceAdapter};

pub(super) fn applicant(credit_score: f64) -> ApplicantRecord {
    ApplicantRecord {
        income: 85_000.0,
        credit_score,
        loan_amount: 20_000.0,
        years_employed: 5.0,
        points: 55.0,
    }
}

pub(super) fn approved_applicant() -> ApplicantRecord {
    applicant(760.0)
}

pub(super) fn rejected_applicant() -> ApplicantRecord {
    applicant(540.0)
}

fn column_index(column: FeatureColumn) -> usize {
    FeatureColumn::ORDER
        .iter()
        .position(|candidate| *candidate == column)
        .expect("column is part of the feature order")
}

/// Approves on credit score alone and records every matrix it receives.
#[derive(Default)]
pub(super) struct CreditCutoffClassifier {
    pub(super) calls: Mutex<Vec<Vec<[f64; FEATURE_COUNT]>>>,
}

impl CreditCutoffClassifier {
    fn approval_probability(row: &[f64; FEATURE_COUNT]) -> f64 {
        let credit = row[column_index(FeatureColumn::CreditScore)];
        if credit >= 700.0 {
            0.85
        } else if credit >= 600.0 {
            0.55
        } else {
            0.1
        }
    }

    pub(super) fn recorded_calls(&self) -> Vec<Vec<[f64; FEATURE_COUNT]>> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl Classifier for CreditCutoffClassifier {
    fn name(&self) -> &str {
        "credit-cutoff"
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<u8>, ModelError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(features.rows().to_vec());
        Ok(features
            .rows()
            .iter()
            .map(|row| u8::from(Self::approval_probability(row) > 0.5))
            .collect())
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        Ok(features
            .rows()
            .iter()
            .map(|row| {
                let approved = Self::approval_probability(row);
                [1.0 - approved, approved]
            })
            .collect())
    }
}

/// Misbehaving classifier used to exercise output validation.
pub(super) enum FaultyClassifier {
    DropsRows,
    ProbabilityAboveOne,
    UnknownLabel,
}

impl Classifier for FaultyClassifier {
    fn name(&self) -> &str {
        "faulty"
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<u8>, ModelError> {
        let label = match self {
            FaultyClassifier::UnknownLabel => 7,
            _ => 1,
        };
        Ok(vec![label; features.len()])
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        match self {
            FaultyClassifier::DropsRows => {
                Ok(vec![[0.2, 0.8]; features.len().saturating_sub(1)])
            }
            FaultyClassifier::ProbabilityAboveOne => Ok(vec![[-0.5, 1.5]; features.len()]),
            FaultyClassifier::UnknownLabel => Ok(vec![[0.2, 0.8]; features.len()]),
        }
    }
}

pub(super) fn adapter_with(classifier: Arc<CreditCutoffClassifier>) -> InferenceAdapter {
    InferenceAdapter::new(ModelState::Loaded(classifier))
}

pub(super) fn unavailable_adapter() -> InferenceAdapter {
    InferenceAdapter::new(ModelState::Unavailable(
        "loan_approval_pipeline.json: not found".to_string(),
    ))
}

pub(super) fn router_with(adapter: InferenceAdapter) -> axum::Router {
    prediction_router(Arc::new(adapter))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
