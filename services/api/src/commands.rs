use crate::infra::{load_adapter, load_config};
use chrono::Utc;
use clap::Args;
use loan_approval::dataset::export::write_predictions;
use loan_approval::dataset::summary::{summarize, value_counts};
use loan_approval::dataset::Dataset;
use loan_approval::error::AppError;
use loan_approval::scoring::router::PredictionResponse;
use loan_approval::scoring::{ApplicantRecord, FeatureColumn};
use serde_json::json;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Annual income
    #[arg(long)]
    pub(crate) income: f64,
    /// Credit score (300-850)
    #[arg(long)]
    pub(crate) credit_score: f64,
    /// Requested loan amount
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Years with the current employer
    #[arg(long)]
    pub(crate) years_employed: f64,
    /// Points score (0-100)
    #[arg(long)]
    pub(crate) points: f64,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model_path: Option<PathBuf>,
    /// Print the full JSON payload instead of a short report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Applicant CSV with income, credit_score, loan_amount, years_employed and points
    pub(crate) input: PathBuf,
    /// Where to write the scored CSV
    #[arg(long, short)]
    pub(crate) output: PathBuf,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DescribeArgs {
    /// Applicant CSV to summarize
    pub(crate) input: PathBuf,
    /// Add display score bands before summarizing
    #[arg(long)]
    pub(crate) bands: bool,
    /// Also count the distinct values of this column
    #[arg(long)]
    pub(crate) value_counts: Option<String>,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        income,
        credit_score,
        loan_amount,
        years_employed,
        points,
        model_path,
        json,
    } = args;

    let config = load_config(model_path)?;
    let adapter = load_adapter(&config);

    let record = ApplicantRecord {
        income,
        credit_score,
        loan_amount,
        years_employed,
        points,
    };
    let response = PredictionResponse::new(adapter.score_one(&record)?);

    if json {
        match serde_json::to_string_pretty(&response) {
            Ok(payload) => println!("{payload}"),
            Err(err) => eprintln!("Unable to render prediction: {err}"),
        }
        return Ok(());
    }

    println!(
        "Decision: {} ({:.2}% confidence)",
        response.prediction_text, response.confidence_pct
    );
    println!("Model features:");
    for column in FeatureColumn::ORDER {
        println!("  {:<20} {}", column.name(), response.features.value(column));
    }
    for warning in &response.warnings {
        println!(
            "  Warning: {} = {} is outside the expected range",
            warning.column, warning.value
        );
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        input,
        output,
        model_path,
    } = args;

    let config = load_config(model_path)?;
    let adapter = load_adapter(&config);

    let dataset = Dataset::from_path(&input)?;
    let batch = adapter.predict_dataset(&dataset)?;
    let scored_at = Utc::now();

    let writer = BufWriter::new(File::create(&output)?);
    write_predictions(&dataset, &batch, writer)?;

    let summary = batch.summary();
    println!(
        "Scored {} applicant(s) from {} at {}",
        summary.total,
        input.display(),
        scored_at.to_rfc3339()
    );
    println!("  Approved: {}", summary.approved);
    println!("  Rejected: {}", summary.rejected);
    if !batch.warnings.is_empty() {
        println!("  Out-of-range values: {}", batch.warnings.len());
    }
    println!("  Results written to {}", output.display());

    Ok(())
}

pub(crate) fn run_describe(args: DescribeArgs) -> Result<(), AppError> {
    let DescribeArgs {
        input,
        bands,
        value_counts: counted_column,
    } = args;

    let dataset = Dataset::from_path(&input)?;
    let dataset = if bands {
        dataset.with_display_bands()
    } else {
        dataset
    };

    let mut payload = json!(summarize(&dataset));
    if let Some(column) = counted_column {
        payload["value_counts"] = match value_counts(&dataset, &column) {
            Some(counts) => json!({ "column": column, "counts": counts }),
            None => json!({ "column": column, "error": "column not found" }),
        };
    }

    match serde_json::to_string_pretty(&payload) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("Unable to render summary: {err}"),
    }

    Ok(())
}
