use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

fn json_request(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn single_prediction_route_returns_processed_features() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));

    // Field order differs from the model's column order on purpose.
    let payload = json!({
        "points": 55.0,
        "years_employed": 5.0,
        "loan_amount": 20000.0,
        "credit_score": 760.0,
        "income": 85000.0,
    });
    let response = router
        .oneshot(json_request("/api/v1/predictions", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "approved");
    assert_eq!(body["prediction_text"], "APPROVED");
    assert_eq!(body["features"]["credit_score_group"], 3);
    assert_eq!(body["features"]["income_score_group"], 1);
    assert_eq!(body["warnings"], json!([]));
}

#[tokio::test]
async fn single_prediction_route_reports_unavailable_model() {
    let router = router_with(unavailable_adapter());

    let response = router
        .oneshot(json_request(
            "/api/v1/predictions",
            serde_json::to_value(approved_applicant()).expect("record serializes"),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .starts_with("model unavailable"));
}

#[tokio::test]
async fn single_prediction_route_names_missing_attributes() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));

    let payload = json!({
        "income": 85000.0,
        "credit_score": 760.0,
        "loan_amount": 20000.0,
        "years_employed": 5.0,
    });
    let response = router
        .oneshot(json_request("/api/v1/predictions", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["missing_columns"], json!(["points"]));
    assert_eq!(body["error"], "missing required column(s): points");
}

#[tokio::test]
async fn single_prediction_route_rejects_textual_attribute() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));

    let payload = json!({
        "income": 85000.0,
        "credit_score": "excellent",
        "loan_amount": 20000.0,
        "years_employed": 5.0,
        "points": 55.0,
    });
    let response = router
        .oneshot(json_request("/api/v1/predictions", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "column 'credit_score' must contain numeric values"
    );
}

#[tokio::test]
async fn single_prediction_route_returns_domain_warnings() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));
    let mut record = approved_applicant();
    record.points = 140.0;

    let response = router
        .oneshot(json_request(
            "/api/v1/predictions",
            serde_json::to_value(record).expect("record serializes"),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["warnings"][0]["column"], "points");
    assert_eq!(body["warnings"][0]["value"], 140.0);
    assert_eq!(body["features"]["points_score_group"], 2);
}

#[tokio::test]
async fn batch_route_scores_uploaded_csv() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));
    let csv = "income,credit_score,loan_amount,years_employed,points\n\
85000,760,20000,5,55\n\
40000,540,9000,1,20\n\
62000,640,15000,3,140\n";

    let response = router
        .oneshot(json_request(
            "/api/v1/predictions/batch",
            json!({ "csv": csv }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["summary"]["total"], 3);
    assert_eq!(body["summary"]["approved"], 2);
    assert_eq!(body["summary"]["rejected"], 1);
    assert_eq!(body["predictions"][1]["decision"], "rejected");
    assert_eq!(body["warnings"][0]["row"], 2);
    assert_eq!(body["warnings"][0]["column"], "points");
}

#[tokio::test]
async fn batch_route_names_missing_columns() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));
    let csv = "income,credit_score,loan_amount,years_employed\n85000,760,20000,5\n";

    let response = router
        .oneshot(json_request(
            "/api/v1/predictions/batch",
            json!({ "csv": csv }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["missing_columns"], json!(["points"]));
}

#[tokio::test]
async fn batch_route_rejects_malformed_csv() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));

    let response = router
        .oneshot(json_request(
            "/api/v1/predictions/batch",
            json!({ "csv": "income,points\n1,2\n3\n" }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn model_route_reports_status() {
    let router = router_with(adapter_with(Arc::new(CreditCutoffClassifier::default())));

    let response = router
        .oneshot(
            Request::get("/api/v1/model")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "loaded");
    assert_eq!(body["model"], "credit-cutoff");
}
