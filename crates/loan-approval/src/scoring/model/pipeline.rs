use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Classifier, ModelError};
use crate::scoring::features::{FeatureColumn, FeatureMatrix, FEATURE_COUNT};

fn default_threshold() -> f64 {
    0.5
}

/// Per-column standardization applied before the linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Serialized scaler + logistic regression exported from the training job.
///
/// ```json
/// {
///   "name": "loan_approval_pipeline",
///   "feature_names": ["income", "credit_score", "..."],
///   "scaler": { "mean": [..], "scale": [..] },
///   "coefficients": [..],
///   "intercept": -0.4,
///   "threshold": 0.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPipeline {
    pub name: String,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticPipeline {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let pipeline: Self = serde_json::from_reader(reader)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Check the artifact was trained against this feature layout.
    pub fn validate(&self) -> Result<(), ModelError> {
        let expected = FeatureColumn::names();
        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(expected.iter())
                .any(|(actual, expected)| actual != expected)
        {
            return Err(ModelError::Invalid(format!(
                "feature_names must be [{}], found [{}]",
                expected.join(", "),
                self.feature_names.join(", ")
            )));
        }

        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "expected {FEATURE_COUNT} coefficients, found {}",
                self.coefficients.len()
            )));
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid(
                "coefficients and intercept must be finite".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.threshold) {
            return Err(ModelError::Invalid(format!(
                "threshold {} must lie in [0, 1)",
                self.threshold
            )));
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
                return Err(ModelError::Invalid(format!(
                    "scaler needs {FEATURE_COUNT} mean and scale entries"
                )));
            }
            if scaler
                .scale
                .iter()
                .any(|scale| !scale.is_finite() || *scale == 0.0)
            {
                return Err(ModelError::Invalid(
                    "scaler scale entries must be finite and non-zero".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn approval_probability(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let score = row
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let scaled = match &self.scaler {
                    Some(scaler) => (value - scaler.mean[index]) / scaler.scale[index],
                    None => *value,
                };
                scaled * self.coefficients[index]
            })
            .sum::<f64>()
            + self.intercept;

        1.0 / (1.0 + (-score).exp())
    }
}

impl Classifier for LogisticPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<u8>, ModelError> {
        features
            .rows()
            .iter()
            .map(|row| {
                let probability = self.approval_probability(row);
                if probability.is_nan() {
                    return Err(ModelError::InvalidOutput(
                        "input contains missing values".to_string(),
                    ));
                }
                Ok(u8::from(probability > self.threshold))
            })
            .collect()
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        Ok(features
            .rows()
            .iter()
            .map(|row| {
                let approved = self.approval_probability(row);
                [1.0 - approved, approved]
            })
            .collect())
    }
}
