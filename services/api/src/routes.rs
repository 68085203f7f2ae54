use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_approval::dataset::summary::{summarize, DatasetSummary};
use loan_approval::dataset::Dataset;
use loan_approval::error::AppError;
use loan_approval::scoring::{prediction_router, InferenceAdapter};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct DatasetSummaryRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) bands: bool,
}

pub(crate) fn with_service_routes(adapter: Arc<InferenceAdapter>) -> axum::Router {
    prediction_router(adapter)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/datasets/summary",
            axum::routing::post(dataset_summary_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dataset_summary_endpoint(
    Json(payload): Json<DatasetSummaryRequest>,
) -> Result<Json<DatasetSummary>, AppError> {
    let DatasetSummaryRequest { csv, bands } = payload;

    let dataset = Dataset::from_reader(Cursor::new(csv.into_bytes()))?;
    let dataset = if bands {
        dataset.with_display_bands()
    } else {
        dataset
    };

    Ok(Json(summarize(&dataset)))
}
