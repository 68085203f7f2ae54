use std::path::PathBuf;

use loan_approval::dataset::{export::write_predictions, Dataset};
use loan_approval::scoring::{
    ApplicantRecord, InferenceAdapter, InferenceError, LoanDecision, ModelState,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_adapter() -> InferenceAdapter {
    let model = ModelState::load(fixture("loan_approval_pipeline.json"));
    assert!(model.is_loaded(), "fixture pipeline should load: {model:?}");
    InferenceAdapter::new(model)
}

#[test]
fn fixture_pipeline_scores_the_applicant_file() {
    let adapter = fixture_adapter();
    let dataset = Dataset::from_path(fixture("loan_applications.csv")).expect("fixture csv");

    let batch = adapter.predict_dataset(&dataset).expect("dataset scores");

    let decisions: Vec<LoanDecision> = batch
        .predictions
        .iter()
        .map(|prediction| prediction.decision)
        .collect();
    assert_eq!(
        decisions,
        vec![
            LoanDecision::Approved,
            LoanDecision::Rejected,
            LoanDecision::Rejected,
            LoanDecision::Approved,
            LoanDecision::Rejected,
            LoanDecision::Approved,
        ]
    );

    let summary = batch.summary();
    assert_eq!((summary.total, summary.approved, summary.rejected), (6, 3, 3));
    assert!(batch.warnings.is_empty());
}

#[test]
fn credit_score_at_cut_point_moves_up_a_group() {
    let adapter = fixture_adapter();
    let base = ApplicantRecord {
        income: 70_000.0,
        credit_score: 668.0,
        loan_amount: 18_000.0,
        years_employed: 4.0,
        points: 50.0,
    };
    let at_cut = ApplicantRecord {
        credit_score: 669.0,
        ..base
    };

    let below = adapter.predict_one(&base).expect("prediction succeeds");
    let above = adapter.predict_one(&at_cut).expect("prediction succeeds");

    assert_eq!(below.decision, LoanDecision::Rejected);
    assert_eq!(above.decision, LoanDecision::Approved);
}

#[test]
fn exported_file_carries_decisions_and_percentages() {
    let adapter = fixture_adapter();
    let dataset = Dataset::from_path(fixture("loan_applications.csv")).expect("fixture csv");
    let batch = adapter.predict_dataset(&dataset).expect("dataset scores");

    let mut output = Vec::new();
    write_predictions(&dataset, &batch, &mut output).expect("export succeeds");
    let text = String::from_utf8(output).expect("utf8 output");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "name,city,income,credit_score,loan_amount,years_employed,points,loan_approved,\
prediction,prediction_text,confidence"
    );
    assert_eq!(lines[1], "Ana,Austin,85000,760,20000,5,55,1,1,APPROVED,95.26");
    assert_eq!(lines[3], "Cai,Chicago,62000,640,15000,3,45,0,0,REJECTED,73.11");
    assert_eq!(lines[5], "Eli,,58000,579,12000,2,35,0,0,REJECTED,73.11");
    assert_eq!(lines.len(), 7);
}

#[test]
fn missing_artifact_leaves_service_reporting_unavailable() {
    let adapter = InferenceAdapter::new(ModelState::load(fixture("missing_pipeline.json")));
    let dataset = Dataset::from_path(fixture("loan_applications.csv")).expect("fixture csv");

    match adapter.predict_dataset(&dataset) {
        Err(InferenceError::UnavailableModel(reason)) => {
            assert!(reason.contains("missing_pipeline.json"))
        }
        other => panic!("expected unavailable model, got {other:?}"),
    }
}
