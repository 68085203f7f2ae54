use serde::{Deserialize, Serialize};

use super::domain::ApplicantRecord;

// Cut-points the deployed classifier was fit against. Each bucket is closed
// below and open above; the last bucket is unbounded.
const INCOME_EDGES: [f64; 3] = [61_000.0, 91_000.0, 120_000.0];
const CREDIT_EDGES: [f64; 3] = [579.0, 669.0, 740.0];
const POINTS_EDGES: [f64; 2] = [30.0, 65.0];

fn bucket(value: f64, edges: &[f64]) -> u8 {
    edges
        .iter()
        .position(|edge| value < *edge)
        .unwrap_or(edges.len()) as u8
}

/// Ordinal income code: 0 below 61k, 1 below 91k, 2 below 120k, else 3.
pub fn income_group(income: f64) -> u8 {
    bucket(income, &INCOME_EDGES)
}

/// Ordinal credit code: 0 below 579, 1 below 669, 2 below 740, else 3.
pub fn credit_group(score: f64) -> u8 {
    bucket(score, &CREDIT_EDGES)
}

/// Ordinal points code: 0 below 30, 1 below 65, else 2.
pub fn points_group(points: f64) -> u8 {
    bucket(points, &POINTS_EDGES)
}

/// The three derived score groups for one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreGroups {
    pub income_score_group: u8,
    pub credit_score_group: u8,
    pub points_score_group: u8,
}

impl ScoreGroups {
    pub fn for_record(record: &ApplicantRecord) -> Self {
        Self {
            income_score_group: income_group(record.income),
            credit_score_group: credit_group(record.credit_score),
            points_score_group: points_group(record.points),
        }
    }
}
