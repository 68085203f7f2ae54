//! Loan approval scoring: score-group binning, fixed-order feature assembly and
//! batch inference against a pre-trained classifier, plus the dataset summaries
//! used when reviewing an uploaded applicant file.

pub mod config;
pub mod dataset;
pub mod error;
pub mod scoring;
pub mod telemetry;
