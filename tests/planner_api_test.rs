//! HTTP-level tests for the planner API.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, backed by
//! the in-memory settings store and a scripted AI provider. "Today" is pinned
//! to a 30-day month so the reference budget gives 22 working days.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use daily_earnings::app::create_app;
use daily_earnings::errors::LlmError;
use daily_earnings::services::llm_service::{LlmProvider, LlmService};
use daily_earnings::state::AppState;
use daily_earnings::store::MemorySettingsStore;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct ScriptedProvider(Result<String, ()>);

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate_json(&self, prompt: String, _schema: Value) -> Result<String, LlmError> {
        assert!(prompt.contains("Required daily earnings"));
        match &self.0 {
            Ok(body) => Ok(body.clone()),
            Err(()) => Err(LlmError::ApiError("HTTP 500: boom".to_string())),
        }
    }
}

fn app_with(llm: LlmService) -> Router {
    let state = AppState::new(Arc::new(MemorySettingsStore::new()), "memory", Arc::new(llm))
        .with_fixed_date(NaiveDate::from_ymd_opt(2026, 9, 10).unwrap());
    create_app(state)
}

fn app() -> Router {
    app_with(LlmService::disabled())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

// ---------------------------------------------------------------------------
// Planner state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_reports_store_and_advice() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["advice_enabled"], false);
}

#[tokio::test]
async fn test_fresh_planner_has_defaults() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/api/planner", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bills"].as_array().unwrap().len(), 4);
    assert_eq!(body["profit"], 1000.0);
    assert_eq!(body["savings"], 500.0);
    assert_eq!(body["off_days"], 8);
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn test_default_summary_is_reference_budget() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/api/planner/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days_in_month"], 30);
    assert_eq!(body["working_days"], 22);
    assert_eq!(body["required_total"], 2985.0);
    assert_eq!(body["formatted"]["daily_earnings"], "$135.68");
}

#[tokio::test]
async fn test_bill_lifecycle() {
    let app = app();

    let (status, bill) = send_json(&app, Method::POST, "/api/planner/bills", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bill["name"], "");
    assert_eq!(bill["amount"], 0.0);
    let id = bill["id"].as_str().unwrap().to_string();

    let (status, bill) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/planner/bills/{}", id),
        Some(json!({"name": "Phone", "amount": "45.5"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bill["name"], "Phone");
    assert_eq!(bill["amount"], 45.5);

    let (_, summary) = send_json(&app, Method::GET, "/api/planner/summary", None).await;
    assert_eq!(summary["total_expenses"], 1530.5);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/planner/bills/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/planner/bills/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_bill_with_fields() {
    let app = app();
    let (status, bill) = send_json(
        &app,
        Method::POST,
        "/api/planner/bills",
        Some(json!({"name": "Water", "amount": -30})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bill["name"], "Water");
    assert_eq!(bill["amount"], 0.0);
}

#[tokio::test]
async fn test_add_bill_rejects_malformed_body() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/planner/bills")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, planner) = send_json(&app, Method::GET, "/api/planner", None).await;
    assert_eq!(planner["bills"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_replace_round_trips_bills() {
    let app = app();
    let payload = json!({
        "bills": [
            {"name": "Rent", "amount": 800},
            {"name": "Rent", "amount": "120.25"},
            {"name": "Snacks", "amount": "abc"}
        ],
        "profit": 300,
        "savings": null,
        "off_days": 4,
        "currency": "eur"
    });
    let (status, saved) = send_json(&app, Method::PUT, "/api/planner", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["currency"], "EUR");
    assert_eq!(saved["savings"], 0.0);

    let (_, loaded) = send_json(&app, Method::GET, "/api/planner", None).await;
    let pairs: Vec<(String, f64)> = loaded["bills"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| (b["name"].as_str().unwrap().to_string(), b["amount"].as_f64().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Rent".to_string(), 800.0),
            ("Rent".to_string(), 120.25),
            ("Snacks".to_string(), 0.0)
        ]
    );

    let (_, summary) = send_json(&app, Method::GET, "/api/planner/summary", None).await;
    assert_eq!(summary["working_days"], 26);
    assert_eq!(summary["currency_symbol"], "€");
}

#[tokio::test]
async fn test_replace_rejects_unknown_currency() {
    let app = app();
    let (status, _) = send(&app, Method::PUT, "/api/planner", Some(json!({"currency": "DOGE"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goals_clamp_off_days() {
    let app = app();
    let (status, settings) =
        send_json(&app, Method::PUT, "/api/planner/goals", Some(json!({"off_days": 50}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["off_days"], 30);

    let (_, summary) = send_json(&app, Method::GET, "/api/planner/summary", None).await;
    assert_eq!(summary["working_days"], 0);
    assert_eq!(summary["daily_earnings"], 0.0);

    let (status, _) = send(&app, Method::PUT, "/api/planner/goals", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_restores_defaults() {
    let app = app();
    send(&app, Method::PUT, "/api/planner/goals", Some(json!({"profit": 5}))).await;
    let (status, settings) = send_json(&app, Method::POST, "/api/planner/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["profit"], 1000.0);

    let (_, loaded) = send_json(&app, Method::GET, "/api/planner", None).await;
    assert_eq!(loaded["profit"], 1000.0);
}

// ---------------------------------------------------------------------------
// Stateless calculators and currencies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_stateless_earnings_calculation() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/earnings/calculate",
        Some(json!({
            "bills": [{"amount": 1200}, {"amount": 75}, {"amount": 60}, {"amount": 150}],
            "profit": 1000,
            "savings": 500,
            "off_days": 8,
            "date": "2026-11-03"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["working_days"], 22);
    assert_eq!(body["formatted"]["daily_earnings"], "$135.68");
}

#[tokio::test]
async fn test_pricing_calculation() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pricing/calculate",
        Some(json!({"total_cost": 200000, "total_items": 50, "desired_profit": 40000, "unit": "bags"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost_per_item"], 4000.0);
    assert_eq!(body["profit_per_item"], 800.0);
    assert_eq!(body["selling_price"], 4800.0);
    assert_eq!(body["unit_label"], "bag");

    let (_, body) = send_json(
        &app,
        Method::POST,
        "/api/pricing/calculate",
        Some(json!({"total_cost": 200000, "total_items": 0, "desired_profit": 40000})),
    )
    .await;
    assert_eq!(body["selling_price"], 0.0);
    assert_eq!(body["cost_per_item"], 0.0);
}

#[tokio::test]
async fn test_pricing_defaults() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/api/pricing/defaults", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product_name"], "50kg Bag of Rice");
    assert_eq!(body["total_items"], 50);
}

#[tokio::test]
async fn test_currency_endpoints() {
    let app = app();
    let (_, list) = send_json(&app, Method::GET, "/api/currencies", None).await;
    let list = list.as_array().unwrap();
    assert!(list.len() >= 50);
    assert_eq!(list[0]["code"], "USD");

    let (_, gbp) = send_json(&app, Method::GET, "/api/currencies/GBP", None).await;
    assert_eq!(gbp["symbol"], "£");
    assert_eq!(gbp["example"], "£1,234.50");

    let (status, unknown) = send_json(&app, Method::GET, "/api/currencies/QQQ", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown["supported"], false);
    assert_eq!(unknown["symbol"], "$");
}

// ---------------------------------------------------------------------------
// Advice
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_advice_success() {
    let body = json!({
        "overallSummary": "Solid plan.",
        "savingsSuggestions": [{"suggestion": "Cook at home", "potentialSavings": 80}],
        "incomeSuggestions": [{"idea": "Tutoring", "potentialIncome": 300}],
        "encouragement": "Keep going!"
    })
    .to_string();
    let app = app_with(LlmService::with_provider(Arc::new(ScriptedProvider(Ok(body)))));

    let (status, advice) = send_json(&app, Method::POST, "/api/advice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(advice["overallSummary"], "Solid plan.");
    assert_eq!(advice["savingsSuggestions"][0]["potentialSavings"], 80.0);
    assert!(advice.get("error").is_none());

    let (_, latest) = send_json(&app, Method::GET, "/api/advice/latest", None).await;
    assert_eq!(latest["state"], "idle");
    assert_eq!(latest["advice"]["incomeSuggestions"][0]["idea"], "Tutoring");
}

#[tokio::test]
async fn test_advice_failure_is_inline_message() {
    let app = app_with(LlmService::with_provider(Arc::new(ScriptedProvider(Err(())))));
    let (status, advice) = send_json(&app, Method::POST, "/api/advice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(advice["error"].as_str().unwrap().contains("try again"));
}

#[tokio::test]
async fn test_advice_without_key() {
    let app = app();
    let (_, latest) = send_json(&app, Method::GET, "/api/advice/latest", None).await;
    assert!(latest["advice"].is_null());

    let (status, advice) = send_json(&app, Method::POST, "/api/advice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(advice["error"].as_str().unwrap().contains("API key"));
}

// ---------------------------------------------------------------------------
// Statement export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_statement_json_and_text() {
    let app = app();
    let (status, statement) = send_json(&app, Method::GET, "/api/statement", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(statement["working_days"], 22);
    assert_eq!(statement["bills"].as_array().unwrap().len(), 4);
    assert_eq!(statement["daily_earnings"]["formatted"], "$135.68");

    let (status, text) = send(&app, Method::GET, "/api/statement/text", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(text).unwrap();
    assert!(text.contains("Monthly Rent"));
    assert!(text.contains("$135.68"));
}

#[tokio::test]
async fn test_statement_pdf_download() {
    let app = app();
    let request = Request::builder()
        .uri("/api/statement/pdf")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"financial-statement-2026-09-10.pdf\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
