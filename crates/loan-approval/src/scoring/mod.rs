//! Inference-time feature engineering and the adapter around the trained
//! loan approval classifier.

pub mod adapter;
pub mod binning;
pub mod domain;
pub mod features;
pub mod model;
pub mod router;

#[cfg(test)]
mod tests;

pub use adapter::{applicant_from_json, applicant_records, InferenceAdapter, InferenceError};
pub use binning::{credit_group, income_group, points_group, ScoreGroups};
pub use domain::{
    ApplicantRecord, BatchPrediction, BatchSummary, DomainWarning, LoanDecision, Prediction,
    ScoredApplicant,
};
pub use features::{FeatureColumn, FeatureMatrix, FeatureVector, FEATURE_COUNT};
pub use model::{Classifier, LogisticPipeline, ModelError, ModelState, StandardScaler};
pub use router::prediction_router;
