use loan_approval::config::AppConfig;
use loan_approval::error::AppError;
use loan_approval::scoring::{InferenceAdapter, ModelState};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load configuration, apply a model path override and initialise logging.
pub(crate) fn load_config(model_path: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = model_path {
        config.model.artifact_path = path;
    }
    loan_approval::telemetry::init(&config.telemetry)?;
    Ok(config)
}

/// Load the classifier once; later requests share the same adapter.
pub(crate) fn load_adapter(config: &AppConfig) -> Arc<InferenceAdapter> {
    Arc::new(InferenceAdapter::new(ModelState::load(
        &config.model.artifact_path,
    )))
}
