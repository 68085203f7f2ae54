//! Labelled score bands for charting uploaded data.
//!
//! These use different edges and interval rules from the inference-time score
//! groups in [`crate::scoring::binning`] and are never fed to the classifier.

use serde::{Deserialize, Serialize};

use super::{Column, Dataset};

const CREDIT_EDGES: [f64; 5] = [300.0, 579.0, 669.0, 740.0, 850.0];
const POINTS_EDGES: [f64; 4] = [0.0, 35.0, 60.0, 100.0];
const INCOME_EDGES: [f64; 5] = [30_053.0, 61_000.0, 91_000.0, 120_000.0, 150_000.0];

/// Right-closed interval index with the first interval also closed on the
/// left. Values outside the outer edges (or NaN) get no interval.
fn cut(value: f64, edges: &[f64]) -> Option<usize> {
    let first = *edges.first()?;
    if value == first {
        return Some(0);
    }
    edges
        .windows(2)
        .position(|bounds| value > bounds[0] && value <= bounds[1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CreditBand {
    const ALL: [Self; 4] = [Self::Poor, Self::Fair, Self::Good, Self::Excellent];

    pub fn from_score(score: f64) -> Option<Self> {
        cut(score, &CREDIT_EDGES).map(|index| Self::ALL[index])
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointsBand {
    Poor,
    Fair,
    Excellent,
}

impl PointsBand {
    const ALL: [Self; 3] = [Self::Poor, Self::Fair, Self::Excellent];

    pub fn from_points(points: f64) -> Option<Self> {
        cut(points, &POINTS_EDGES).map(|index| Self::ALL[index])
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeBand {
    Limited,
    Moderate,
    Solid,
    High,
}

impl IncomeBand {
    const ALL: [Self; 4] = [Self::Limited, Self::Moderate, Self::Solid, Self::High];

    pub fn from_income(income: f64) -> Option<Self> {
        cut(income, &INCOME_EDGES).map(|index| Self::ALL[index])
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Limited => "Limited",
            Self::Moderate => "Moderate",
            Self::Solid => "Solid",
            Self::High => "High",
        }
    }
}

impl Dataset {
    /// Copy of the table with `credit_score_group`, `points_score_group` and
    /// `income_score_group` label columns for every numeric source present.
    pub fn with_display_bands(&self) -> Dataset {
        let mut banded = self.clone();

        let bands: [(&str, &str, fn(f64) -> Option<&'static str>); 3] = [
            ("credit_score", "credit_score_group", |v: f64| {
                CreditBand::from_score(v).map(CreditBand::label)
            }),
            ("points", "points_score_group", |v: f64| {
                PointsBand::from_points(v).map(PointsBand::label)
            }),
            ("income", "income_score_group", |v: f64| {
                IncomeBand::from_income(v).map(IncomeBand::label)
            }),
        ];

        for (source, target, band) in bands {
            if let Some(values) = self.numeric_values(source) {
                let labels = values
                    .iter()
                    .map(|value| value.and_then(band).map(str::to_string))
                    .collect();
                banded.set_column(Column::text(target, labels));
            }
        }

        banded
    }
}
