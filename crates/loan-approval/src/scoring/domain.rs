use serde::{Deserialize, Serialize};

use super::features::FeatureColumn;

/// Raw financial attributes describing one loan applicant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub income: f64,
    pub credit_score: f64,
    pub loan_amount: f64,
    pub years_employed: f64,
    pub points: f64,
}

impl ApplicantRecord {
    /// Raw attribute backing one of the five applicant columns.
    ///
    /// Returns `None` for the derived score-group columns.
    pub fn raw_value(&self, column: FeatureColumn) -> Option<f64> {
        match column {
            FeatureColumn::Income => Some(self.income),
            FeatureColumn::CreditScore => Some(self.credit_score),
            FeatureColumn::LoanAmount => Some(self.loan_amount),
            FeatureColumn::YearsEmployed => Some(self.years_employed),
            FeatureColumn::Points => Some(self.points),
            FeatureColumn::CreditScoreGroup
            | FeatureColumn::PointsScoreGroup
            | FeatureColumn::IncomeScoreGroup => None,
        }
    }

    /// Attributes that fall outside the range the intake form accepts.
    ///
    /// Binning is total, so these still score; they are surfaced as warnings.
    /// Missing values (NaN) are left to the model.
    pub fn out_of_domain(&self) -> Vec<(FeatureColumn, f64)> {
        FeatureColumn::RAW
            .iter()
            .filter_map(|&column| {
                let value = self.raw_value(column)?;
                if value.is_nan() || within_domain(column, value) {
                    None
                } else {
                    Some((column, value))
                }
            })
            .collect()
    }
}

fn within_domain(column: FeatureColumn, value: f64) -> bool {
    match column {
        FeatureColumn::CreditScore => (300.0..=850.0).contains(&value),
        FeatureColumn::Points => (0.0..=100.0).contains(&value),
        _ => value >= 0.0,
    }
}

/// Binary outcome reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanDecision {
    Approved,
    Rejected,
}

impl LoanDecision {
    /// Map a model class label; the positive class (1) means approved.
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            1 => Some(Self::Approved),
            0 => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Self::Approved => 1,
            Self::Rejected => 0,
        }
    }

    pub fn display_text(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// Normalized classifier output for one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub decision: LoanDecision,
    /// Highest class probability, in `[0, 1]`.
    pub confidence: f64,
}

impl Prediction {
    pub fn confidence_pct(&self) -> f64 {
        self.confidence * 100.0
    }
}

/// Non-fatal notice that an input value lies outside its expected range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainWarning {
    pub row: usize,
    pub column: FeatureColumn,
    pub value: f64,
}

/// One applicant's prediction with the warnings raised while scoring it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredApplicant {
    pub record: ApplicantRecord,
    pub prediction: Prediction,
    pub warnings: Vec<DomainWarning>,
}

/// Predictions for a batch, aligned 1:1 with the input rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub predictions: Vec<Prediction>,
    pub warnings: Vec<DomainWarning>,
}

impl BatchPrediction {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn summary(&self) -> BatchSummary {
        let approved = self
            .predictions
            .iter()
            .filter(|prediction| prediction.decision == LoanDecision::Approved)
            .count();

        BatchSummary {
            total: self.predictions.len(),
            approved,
            rejected: self.predictions.len() - approved,
        }
    }
}

/// Headline counts shown above batch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
}
