use serde::{Deserialize, Serialize};

use super::binning::ScoreGroups;
use super::domain::ApplicantRecord;

pub const FEATURE_COUNT: usize = 8;

/// Columns of the feature table handed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    Income,
    CreditScore,
    LoanAmount,
    YearsEmployed,
    Points,
    CreditScoreGroup,
    PointsScoreGroup,
    IncomeScoreGroup,
}

impl FeatureColumn {
    /// Column order the model was trained with. Rows are assembled by walking
    /// this array.
    pub const ORDER: [FeatureColumn; FEATURE_COUNT] = [
        FeatureColumn::Income,
        FeatureColumn::CreditScore,
        FeatureColumn::LoanAmount,
        FeatureColumn::YearsEmployed,
        FeatureColumn::Points,
        FeatureColumn::CreditScoreGroup,
        FeatureColumn::PointsScoreGroup,
        FeatureColumn::IncomeScoreGroup,
    ];

    /// Raw applicant columns a batch table must provide.
    pub const RAW: [FeatureColumn; 5] = [
        FeatureColumn::Income,
        FeatureColumn::CreditScore,
        FeatureColumn::LoanAmount,
        FeatureColumn::YearsEmployed,
        FeatureColumn::Points,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureColumn::Income => "income",
            FeatureColumn::CreditScore => "credit_score",
            FeatureColumn::LoanAmount => "loan_amount",
            FeatureColumn::YearsEmployed => "years_employed",
            FeatureColumn::Points => "points",
            FeatureColumn::CreditScoreGroup => "credit_score_group",
            FeatureColumn::PointsScoreGroup => "points_score_group",
            FeatureColumn::IncomeScoreGroup => "income_score_group",
        }
    }

    pub fn names() -> [&'static str; FEATURE_COUNT] {
        Self::ORDER.map(FeatureColumn::name)
    }
}

impl std::fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Applicant record extended with its score groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub income: f64,
    pub credit_score: f64,
    pub loan_amount: f64,
    pub years_employed: f64,
    pub points: f64,
    pub credit_score_group: u8,
    pub points_score_group: u8,
    pub income_score_group: u8,
}

impl FeatureVector {
    pub fn from_record(record: &ApplicantRecord) -> Self {
        let groups = ScoreGroups::for_record(record);
        Self {
            income: record.income,
            credit_score: record.credit_score,
            loan_amount: record.loan_amount,
            years_employed: record.years_employed,
            points: record.points,
            credit_score_group: groups.credit_score_group,
            points_score_group: groups.points_score_group,
            income_score_group: groups.income_score_group,
        }
    }

    pub fn value(&self, column: FeatureColumn) -> f64 {
        match column {
            FeatureColumn::Income => self.income,
            FeatureColumn::CreditScore => self.credit_score,
            FeatureColumn::LoanAmount => self.loan_amount,
            FeatureColumn::YearsEmployed => self.years_employed,
            FeatureColumn::Points => self.points,
            FeatureColumn::CreditScoreGroup => f64::from(self.credit_score_group),
            FeatureColumn::PointsScoreGroup => f64::from(self.points_score_group),
            FeatureColumn::IncomeScoreGroup => f64::from(self.income_score_group),
        }
    }

    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        FeatureColumn::ORDER.map(|column| self.value(column))
    }
}

/// Row-major feature table; row `i` belongs to input record `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureMatrix {
    pub fn from_records(records: &[ApplicantRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| FeatureVector::from_record(record).to_row())
            .collect();
        Self { rows }
    }

    pub fn columns(&self) -> &'static [FeatureColumn; FEATURE_COUNT] {
        &FeatureColumn::ORDER
    }

    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
