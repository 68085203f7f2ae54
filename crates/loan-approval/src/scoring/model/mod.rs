//! Narrow interface over the externally trained classifier.

mod pipeline;

pub use pipeline::{LogisticPipeline, StandardScaler};

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::features::FeatureMatrix;

/// Binary classifier consumed for prediction only.
///
/// Both methods receive the same matrix and must return one entry per row,
/// in row order.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Class label per row, `0` (rejected) or `1` (approved).
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<u8>, ModelError>;

    /// `[p(rejected), p(approved)]` per row.
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>, ModelError>;
}

/// Error raised while loading or invoking a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model artifact rejected: {0}")]
    Invalid(String),
    #[error("model returned {actual} rows for {expected} inputs")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("model returned unusable output: {0}")]
    InvalidOutput(String),
}

/// Outcome of the one-time model load, shared read-only afterwards.
#[derive(Clone)]
pub enum ModelState {
    Loaded(Arc<dyn Classifier>),
    Unavailable(String),
}

impl ModelState {
    /// Load the serialized pipeline, recording rather than propagating a failure
    /// so the service can still start and report the model as unavailable.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match LogisticPipeline::from_path(path) {
            Ok(pipeline) => {
                info!(model = pipeline.name(), path = %path.display(), "classifier loaded");
                Self::Loaded(Arc::new(pipeline))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "classifier unavailable");
                Self::Unavailable(format!("{}: {err}", path.display()))
            }
        }
    }

    pub fn loaded<C: Classifier + 'static>(classifier: C) -> Self {
        Self::Loaded(Arc::new(classifier))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn model_name(&self) -> Option<&str> {
        match self {
            Self::Loaded(classifier) => Some(classifier.name()),
            Self::Unavailable(_) => None,
        }
    }
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded(classifier) => {
                f.debug_tuple("Loaded").field(&classifier.name()).finish()
            }
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}
