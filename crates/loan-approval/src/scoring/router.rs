use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::adapter::{InferenceAdapter, InferenceError};
use super::domain::{BatchSummary, DomainWarning, LoanDecision, Prediction, ScoredApplicant};
use super::features::FeatureVector;
use super::model::ModelState;
use crate::dataset::Dataset;

/// Single-applicant result with the processed features sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub decision: LoanDecision,
    pub prediction_text: String,
    pub confidence: f64,
    pub confidence_pct: f64,
    pub features: FeatureVector,
    pub warnings: Vec<DomainWarning>,
}

impl PredictionResponse {
    pub fn new(scored: ScoredApplicant) -> Self {
        let ScoredApplicant {
            record,
            prediction,
            warnings,
        } = scored;

        Self {
            decision: prediction.decision,
            prediction_text: prediction.decision.display_text().to_string(),
            confidence: prediction.confidence,
            confidence_pct: prediction.confidence_pct(),
            features: FeatureVector::from_record(&record),
            warnings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionRequest {
    /// CSV text with at least the five raw applicant columns.
    pub csv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    pub scored_at: DateTime<Utc>,
    pub summary: BatchSummary,
    pub predictions: Vec<Prediction>,
    pub warnings: Vec<DomainWarning>,
}

/// Router builder exposing the scoring endpoints.
pub fn prediction_router(adapter: Arc<InferenceAdapter>) -> Router {
    Router::new()
        .route("/api/v1/model", get(model_status_handler))
        .route("/api/v1/predictions", post(predict_handler))
        .route("/api/v1/predictions/batch", post(batch_handler))
        .with_state(adapter)
}

pub(crate) async fn model_status_handler(
    State(adapter): State<Arc<InferenceAdapter>>,
) -> Response {
    let payload = match adapter.model() {
        ModelState::Loaded(classifier) => json!({
            "status": "loaded",
            "model": classifier.name(),
        }),
        ModelState::Unavailable(reason) => json!({
            "status": "unavailable",
            "reason": reason,
        }),
    };
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn predict_handler(
    State(adapter): State<Arc<InferenceAdapter>>,
    axum::Json(payload): axum::Json<Value>,
) -> Response {
    match adapter.score_json(&payload) {
        Ok(scored) => {
            let body = PredictionResponse::new(scored);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => inference_error_response(error),
    }
}

pub(crate) async fn batch_handler(
    State(adapter): State<Arc<InferenceAdapter>>,
    axum::Json(request): axum::Json<BatchPredictionRequest>,
) -> Response {
    let dataset = match Dataset::from_reader(Cursor::new(request.csv.into_bytes())) {
        Ok(dataset) => dataset,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match adapter.predict_dataset(&dataset) {
        Ok(batch) => {
            let body = BatchPredictionResponse {
                scored_at: Utc::now(),
                summary: batch.summary(),
                predictions: batch.predictions,
                warnings: batch.warnings,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => inference_error_response(error),
    }
}

pub(crate) fn inference_error_response(error: InferenceError) -> Response {
    let status = match &error {
        InferenceError::UnavailableModel(_) => StatusCode::SERVICE_UNAVAILABLE,
        InferenceError::MissingFeature { .. } | InferenceError::NonNumericFeature { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        InferenceError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut payload = json!({ "error": error.to_string() });
    if let InferenceError::MissingFeature { columns } = &error {
        payload["missing_columns"] = json!(columns);
    }

    (status, axum::Json(payload)).into_response()
}
